use chrono::{TimeZone, Utc};
use ftp_fs::{
    fs::{Config, FileMode},
    session::{memory::Call, Entry, EntryType, MemorySession, Reply},
    ErrorKind, FtpFs,
};
use tokio::io::AsyncReadExt;

fn mirror() -> MemorySession {
    let time = Utc.with_ymd_and_hms(2023, 11, 5, 8, 30, 0).unwrap();

    MemorySession::new()
        .with_listing(
            "/",
            [Entry::dir("."), Entry::dir(".."), Entry::dir("x"), Entry::dir("pub")],
        )
        .with_listing("/x", [Entry::file("z", 1)])
        .with_listing(
            "/pub",
            [
                Entry::dir("."),
                Entry::dir(".."),
                Entry::file("b.txt", 4),
                Entry::file("a.txt", 3).with_time(time),
                Entry::link("latest"),
                Entry::dir("releases"),
            ],
        )
        .with_file("/pub/a.txt", b"abc".to_vec())
        .with_file("/pub/b.txt", b"bbbb".to_vec())
}

#[tokio::test]
async fn listing_is_clean_and_sorted() {
    let mut fs = FtpFs::new(mirror());

    let names: Vec<_> = fs
        .read_dir("/pub")
        .await
        .unwrap()
        .map(|e| e.file_name())
        .collect();

    assert_eq!(names, vec!["a.txt", "b.txt", "latest", "releases"]);
    assert!(names.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn stat_matches_listing() {
    let mut fs = FtpFs::new(mirror());

    let meta = fs.metadata("/pub/a.txt").await.unwrap();
    assert_eq!(meta.name(), "a.txt");
    assert_eq!(meta.size(), 3);
    assert_eq!(meta.mode(), FileMode::REG);
    assert_eq!(
        meta.mod_time(),
        Some(Utc.with_ymd_and_hms(2023, 11, 5, 8, 30, 0).unwrap())
    );

    let link = fs.metadata("/pub/latest").await.unwrap();
    assert!(link.mode().is_symlink());
    assert_eq!(link.file_type(), &EntryType::Link);

    let dir = fs.metadata("/pub/releases/").await.unwrap();
    assert!(dir.is_dir());
}

#[tokio::test]
async fn stat_missing_reports_siblings() {
    let mut fs = FtpFs::new(mirror());

    let err = fs.metadata("/x/y").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "y: not found among [z]");
}

#[tokio::test]
async fn open_read_close() {
    let mut fs = FtpFs::new(mirror());

    let mut file = fs.open("/pub/b.txt").await.unwrap();
    assert_eq!(file.path(), "/pub/b.txt");
    assert_eq!(file.metadata().size(), 4);

    let mut buf = [0u8; 2];
    assert_eq!(file.read(&mut buf).await.unwrap(), 2);
    assert_eq!(&buf, b"bb");
    file.close().await.unwrap();

    // the next transfer on the same session works after a partial read
    assert_eq!(fs.read("/pub/a.txt").await.unwrap(), b"abc");

    let closes: Vec<_> = fs
        .session()
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Close { unread, .. } => Some(unread),
            _ => None,
        })
        .collect();
    assert_eq!(closes, vec![0, 0]);
}

#[tokio::test]
async fn open_missing_does_not_transfer() {
    let mut fs = FtpFs::new(mirror());

    let err = fs.open("/pub/c.txt").await.err().unwrap();
    assert!(err.is_not_found());
    assert_eq!(
        fs.into_inner().calls(),
        vec![Call::List("/pub".to_owned())]
    );
}

#[tokio::test]
async fn transport_errors_keep_context() {
    let session = mirror()
        .with_list_reset("/broken")
        .with_list_reply("/denied", Reply::new(530, "Not logged in"));
    let mut fs = FtpFs::new(session);

    let err = fs.read_dir("/broken").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(std::error::Error::source(&err).is_some());

    let err = fs.metadata("/denied/file").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert_eq!(err.to_string(), "/denied: 530 Not logged in");
}

#[tokio::test]
async fn unknown_entry_type_is_fatal() {
    let session = MemorySession::new().with_listing(
        "/dev",
        [Entry::new("null", EntryType::Other("OS.unix=chr-1/3".to_owned()))],
    );
    let mut fs = FtpFs::new(session);

    assert!(fs.metadata("/dev/null").await.unwrap_err().is_fatal());
    assert!(fs.read_dir("/dev").await.unwrap_err().is_fatal());
}

#[tokio::test]
async fn config_from_json() {
    let config: Config = serde_json::from_str(r#"{ "root": "/pub" }"#).unwrap();
    assert_eq!(config.root.as_deref(), Some("/pub"));

    let empty: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(empty, Config::default());

    let mut fs = FtpFs::with_config(mirror(), config);
    assert_eq!(fs.config().root.as_deref(), Some("/pub"));
    assert_eq!(fs.read("b.txt").await.unwrap(), b"bbbb");
}
