use ftp_fs::{
    session::{Entry, MemorySession},
    FtpFs,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let session = MemorySession::new()
        .with_listing(
            "/pub",
            [
                Entry::dir("."),
                Entry::dir(".."),
                Entry::file("README", 12),
                Entry::dir("dists"),
                Entry::link("current"),
            ],
        )
        .with_file("/pub/README", b"hello world\n".to_vec());

    let mut fs = FtpFs::new(session);

    for entry in fs.read_dir("/pub").await? {
        println!("{:?} {}", entry.file_type(), entry.file_name());
    }

    println!("README: {:?}", fs.metadata("/pub/README").await?);
    println!("{}", String::from_utf8_lossy(&fs.read("/pub/README").await?));

    Ok(())
}
