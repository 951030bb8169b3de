use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use models::Id;
use service::api::images::UploadFile;
use service::repository::{HttpAlbums, HttpContacts, HttpFolders, HttpServices};
use service::upload::FileOutcome;
use service::{ApiClient, JsonFileSessionStore, SessionManager};
use tracing::{error, info};
use views::screens::{AlbumDetailScreen, DashboardScreen, LoginScreen, MessagesScreen, ServicesScreen};
use views::{MountOutcome, NoScroll};

const USAGE: &str = "usage: portal-admin <command>
  login <username> <password>
  logout
  whoami
  dashboard
  messages
  services
  upload <album_id> <file>...";

fn main() -> ExitCode {
    let dotenv = common::env::load_dotenv();
    let cfg = match configs::AppConfig::load_or_default() {
        Ok(cfg) => cfg,
        Err(e) => {
            common::utils::logging::init_logging_default();
            dotenv.log();
            error!(event = "config_invalid", error = %e, "configuration rejected");
            return ExitCode::FAILURE;
        }
    };
    common::utils::logging::init_logging(&cfg.logging.format);
    dotenv.log();
    info!(event = "start", version = env!("CARGO_PKG_VERSION"), api = %cfg.api.base_url, "portal-admin starting");

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    match rt.block_on(run(cfg, args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cfg: configs::AppConfig, args: Vec<String>) -> Result<()> {
    let client = ApiClient::from_config(&cfg.api)?;
    let store = Arc::new(JsonFileSessionStore::open(&cfg.storage.session_file).await?);
    let manager = SessionManager::new(client.clone(), Arc::clone(&store));

    let Some((command, rest)) = args.split_first() else { bail!(USAGE) };
    match (command.as_str(), rest) {
        ("login", [username, password]) => {
            let mut screen = LoginScreen::new();
            screen.username = username.clone();
            screen.password = password.clone();
            let session = screen.submit(&manager).await.map_err(|e| anyhow!(e.user_message()))?;
            println!("signed in as {}", session.username().unwrap_or("admin"));
        }
        ("logout", []) => {
            manager.logout().await?;
            println!("signed out");
        }
        ("whoami", []) => {
            let session = manager.current().await?.context("not signed in")?;
            let me = manager.whoami(&session).await.map_err(|e| anyhow!(e.user_message()))?;
            println!("{}{}", me.username, if me.disabled.unwrap_or(false) { " (disabled)" } else { "" });
        }
        ("dashboard", []) => {
            let mut screen = DashboardScreen::new(HttpAlbums(client.clone()), HttpFolders(client.clone()), client.clone());
            signed_in(screen.mount(store.as_ref()).await)?;
            println!("{}", screen.greeting());
            if let Some(s) = screen.statistics {
                println!(
                    "albums {}  images {}  services {}  messages {} ({} unread)",
                    s.album_count, s.image_count, s.service_count, s.contact_count, s.unread_contact_count
                );
            }
            for album in &screen.albums {
                println!("  album  #{:<4} {:<9} {}", album.id, album.label.as_str(), album.name);
            }
            for folder in &screen.folders {
                println!("  folder #{:<4} {}", folder.id, folder.name);
            }
        }
        ("messages", []) => {
            let mut screen = MessagesScreen::new(HttpContacts(client.clone()));
            signed_in(screen.mount(store.as_ref()).await)?;
            println!("{} unread", screen.unread_count());
            for m in screen.visible() {
                let mark = if m.is_read { ' ' } else { '*' };
                println!("{mark} #{:<4} {} <{}> {}: {}", m.id, m.created_at, m.email, m.name, m.message);
            }
        }
        ("services", []) => {
            let mut screen = ServicesScreen::new(HttpServices(client.clone()), cfg.services.reorder.into());
            signed_in(screen.mount(store.as_ref()).await)?;
            for s in screen.services() {
                println!("{:>3}  #{:<4} {}", s.order, s.id, s.name);
            }
        }
        ("upload", [album_id, files @ ..]) if !files.is_empty() => {
            let album_id: Id = album_id.parse().with_context(|| format!("invalid album id {album_id:?}"))?;
            let mut picked = Vec::with_capacity(files.len());
            for path in files {
                picked.push(UploadFile::from_path(path).await.with_context(|| format!("reading {path}"))?);
            }
            let mut screen = AlbumDetailScreen::new(client.clone(), album_id, cfg.upload.policy.into(), NoScroll);
            signed_in(screen.mount(store.as_ref()).await)?;
            let report = screen.upload(&picked).await?;
            for (name, outcome) in &report.files {
                println!("{name}: {}", describe(outcome));
            }
            if let Some(notice) = screen.notice() {
                println!("{}", notice.message);
            }
            if !report.is_success() {
                bail!("upload incomplete");
            }
        }
        _ => bail!(USAGE),
    }
    Ok(())
}

fn signed_in(outcome: MountOutcome) -> Result<()> {
    match outcome {
        MountOutcome::Ready => Ok(()),
        MountOutcome::RedirectToLogin => Err(anyhow!("not signed in; run `portal-admin login <username> <password>`")),
    }
}

fn describe(outcome: &FileOutcome) -> String {
    match outcome {
        FileOutcome::Uploaded(image) => format!("uploaded as image #{}", image.id),
        FileOutcome::Failed(e) => format!("failed: {}", e.user_message()),
        FileOutcome::Skipped => "skipped".to_string(),
        FileOutcome::RolledBack(image) => format!("rolled back (image #{} removed)", image.id),
        FileOutcome::RollbackFailed { image, error } => {
            format!("rollback failed, image #{} remains: {}", image.id, error.user_message())
        }
    }
}
