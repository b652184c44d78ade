//! Save a draft, export it to disk and import the file back

use hookdraft_backup::{Attachment, BackupConfig, BackupStore, MessageEditor};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let workdir = std::env::temp_dir().join("hookdraft-demo");
    let config = BackupConfig::new().storage_dir(workdir.join("store"));

    let editor = MessageEditor::new();
    let store = BackupStore::from_config(&config, editor.clone());
    store.initialize().await?;

    editor.update(|message| {
        message.insert("content", json!("Deploy finished"));
        message.insert("username", json!("CI"));
        message.insert(
            "embeds",
            json!([{ "title": "main@4f2c", "footer": { "iconUrl": "https://cdn.example/ci.png" } }]),
        );
    });
    editor.attach(Attachment::new("build.log", "ok\n"));

    let name = store.create_backup("  deploy   notice ").await?;
    println!("Saved backup {:?}", name);

    let artifact = store.export_backup(&name).await?;
    let path = artifact.write_to_dir(workdir.join("exports")).await?;
    println!("Exported to {}\n{}", path.display(), artifact.contents);

    let bytes = tokio::fs::read(&path).await?;
    let report = store.import_backups(&bytes).await?;
    println!("Imported as {:?}", report.succeeded);

    let backups: Vec<String> = store.backup_list().into_iter().map(|b| b.name).collect();
    println!("Backups: {:?}", backups);

    println!("Share link: {}", store.share_link(&name).await?);
    Ok(())
}
