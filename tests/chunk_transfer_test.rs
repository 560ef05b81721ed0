//! Single-file transfers over an in-memory data connection

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use clouddrive::callbacks::EventsBuilder;
use clouddrive::error::ClientError;
use clouddrive::protocol::STOP_TRANSMISSION_WIRE;
use clouddrive::transfer::TransferSession;
use tempfile::TempDir;
use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt};

fn sample(len: usize) -> Vec<u8> {
	(0..len).map(|i| (i * 31 % 251) as u8).collect()
}

/// Upload `data` with `chunk_size` and return what the server received
async fn upload_through(data: &[u8], chunk_size: usize) -> Vec<u8> {
	let dir = TempDir::new().unwrap();
	let src = dir.path().join("src.bin");
	std::fs::write(&src, data).unwrap();

	let (client, mut server) = duplex(16 * 1024);
	let reader = tokio::spawn(async move {
		let mut received = Vec::new();
		server.read_to_end(&mut received).await.unwrap();
		received
	});

	let mut session = TransferSession::new(client, chunk_size);
	let sent = session.upload_file(&src, data.len() as u64, false).await.unwrap();
	assert_eq!(sent, data.len() as u64);
	assert_eq!(session.bytes_transferred(), data.len() as u64);
	drop(session);

	reader.await.unwrap()
}

/// Serve `data` to a download with `chunk_size`, closing afterwards
async fn download_through(data: Vec<u8>, chunk_size: usize) -> Vec<u8> {
	let dir = TempDir::new().unwrap();
	let dest = dir.path().join("dest.bin");

	let (client, mut server) = duplex(16 * 1024);
	let writer = tokio::spawn(async move {
		server.write_all(&data).await.unwrap();
	});

	let mut session = TransferSession::new(client, chunk_size);
	session.download_file(&dest).await.unwrap();
	writer.await.unwrap();

	std::fs::read(&dest).unwrap()
}

#[tokio::test]
async fn test_round_trip_is_byte_identical() {
	for (size, chunk) in [(1usize, 1usize), (5_000, 7), (70_000, 4096)] {
		let data = sample(size);
		let uploaded = upload_through(&data, chunk).await;
		assert_eq!(uploaded, data, "upload size={} chunk={}", size, chunk);
		let downloaded = download_through(uploaded, chunk).await;
		assert_eq!(downloaded.len(), size);
		assert_eq!(downloaded, data, "download size={} chunk={}", size, chunk);
	}
}

#[tokio::test]
async fn test_peer_gone_mid_upload_invalidates_session() {
	let dir = TempDir::new().unwrap();
	let src = dir.path().join("big.bin");
	let data = sample(1_000_000);
	std::fs::write(&src, &data).unwrap();

	let (client, mut server) = duplex(1024);
	let reader = tokio::spawn(async move {
		let mut head = vec![0u8; 4096];
		server.read_exact(&mut head).await.unwrap();
		head
	});

	let mut session = TransferSession::new(client, 512);
	let err = session.upload_file(&src, data.len() as u64, false).await.unwrap_err();
	assert!(matches!(err, ClientError::SendData { .. }), "got {:?}", err);
	assert!(!session.is_valid());
	assert!(session.bytes_transferred() < data.len() as u64);

	assert_eq!(reader.await.unwrap(), &data[..4096]);
}

#[tokio::test]
async fn test_zero_byte_file_both_directions() {
	assert!(upload_through(&[], 1024).await.is_empty());

	let dir = TempDir::new().unwrap();
	let dest = dir.path().join("empty");
	let (client, _server) = duplex(64);
	// chunk size 0 never enters the receive loop
	let mut session = TransferSession::new(client, 0);
	let started = Instant::now();
	assert_eq!(session.download_file(&dest).await.unwrap(), 0);
	assert!(started.elapsed() < Duration::from_secs(1));
	assert_eq!(std::fs::metadata(&dest).unwrap().len(), 0);
}

#[tokio::test]
async fn test_idle_timeout_completes_download() {
	let dir = TempDir::new().unwrap();
	let dest = dir.path().join("stalled.bin");

	let (client, mut server) = duplex(1024);
	let srv = tokio::spawn(async move {
		server.write_all(b"partial body").await.unwrap();
		// stall well past the idle timeout without closing
		tokio::time::sleep(Duration::from_millis(800)).await;
		drop(server);
	});

	let mut session =
		TransferSession::new(client, 64).with_idle_timeout(Duration::from_millis(200));
	let written = session.download_file(&dest).await.unwrap();
	assert_eq!(written, 12);
	assert!(session.is_valid());
	assert_eq!(std::fs::read(&dest).unwrap(), b"partial body");
	srv.await.unwrap();
}

#[tokio::test]
async fn test_stop_marker_is_not_written() {
	let dir = TempDir::new().unwrap();
	let dest = dir.path().join("body.txt");

	let (client, mut server) = duplex(1024);
	let srv = tokio::spawn(async move {
		server.write_all(b"body").await.unwrap();
		tokio::time::sleep(Duration::from_millis(50)).await;
		server.write_all(STOP_TRANSMISSION_WIRE).await.unwrap();
		tokio::time::sleep(Duration::from_millis(500)).await;
		server
	});

	let mut session = TransferSession::new(client, 1024).with_idle_timeout(Duration::from_secs(5));
	session.download_file(&dest).await.unwrap();
	assert_eq!(std::fs::read(&dest).unwrap(), b"body");
	srv.await.unwrap();
}

/// Upload `len` bytes with progress reporting on and count the updates
async fn progress_updates_for(len: usize) -> (usize, Vec<u64>, usize) {
	let dir = TempDir::new().unwrap();
	let src = dir.path().join("big.bin");
	std::fs::write(&src, sample(len)).unwrap();

	let updates = Arc::new(AtomicUsize::new(0));
	let percents = Arc::new(Mutex::new(Vec::new()));
	let done = Arc::new(AtomicUsize::new(0));
	let (u, p, d) = (Arc::clone(&updates), Arc::clone(&percents), Arc::clone(&done));
	let events = EventsBuilder::new()
		.on_progress(move |update| {
			u.fetch_add(1, Ordering::SeqCst);
			p.lock().unwrap().push(update.percent);
		})
		.on_file_done(move |_, _| {
			d.fetch_add(1, Ordering::SeqCst);
		})
		.build();

	let (client, mut server) = duplex(64 * 1024);
	let reader = tokio::spawn(async move {
		let mut sink = Vec::new();
		server.read_to_end(&mut sink).await.unwrap();
		sink.len()
	});

	let mut session =
		TransferSession::new(client, 64 * 1024).with_events(Arc::new(events), 1_000_000);
	session.upload_file(&src, len as u64, true).await.unwrap();
	drop(session);
	assert_eq!(reader.await.unwrap(), len);

	let percents = percents.lock().unwrap().clone();
	(updates.load(Ordering::SeqCst), percents, done.load(Ordering::SeqCst))
}

#[tokio::test]
async fn test_progress_fires_for_file_just_over_threshold() {
	let (count, percents, done) = progress_updates_for(1_000_001).await;
	assert!(count >= 1);
	assert!(percents.iter().all(|p| *p <= 100));
	assert_eq!(done, 1);
}

#[tokio::test]
async fn test_progress_silent_below_threshold() {
	let (count, _, done) = progress_updates_for(999_999).await;
	assert_eq!(count, 0);
	assert_eq!(done, 1);
}

#[tokio::test]
async fn test_upload_without_reporting_is_silent() {
	let dir = TempDir::new().unwrap();
	let src = dir.path().join("big.bin");
	std::fs::write(&src, sample(2_000_000)).unwrap();

	let fired = Arc::new(AtomicUsize::new(0));
	let f = Arc::clone(&fired);
	let events = EventsBuilder::new()
		.on_progress(move |_| {
			f.fetch_add(1, Ordering::SeqCst);
		})
		.build();

	let (client, mut server) = duplex(64 * 1024);
	let reader = tokio::spawn(async move {
		let mut sink = Vec::new();
		server.read_to_end(&mut sink).await.unwrap();
	});
	let mut session = TransferSession::new(client, 8192).with_events(Arc::new(events), 1_000_000);
	session.upload_file(&src, 2_000_000, false).await.unwrap();
	drop(session);
	reader.await.unwrap();

	assert_eq!(fired.load(Ordering::SeqCst), 0);
}
