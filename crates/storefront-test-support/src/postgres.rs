//! Disposable Postgres databases for integration suites.
//!
//! An external server named by `STOREFRONT_TEST_DATABASE_URL` is preferred.
//! Without it, a throwaway server is started from local `initdb`, `postgres`,
//! and `pg_isready` binaries and torn down when the handle drops.

use std::fs;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::str::FromStr;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow, bail};
use postgres::NoTls;
use url::Url;

/// Environment variable naming the server used by integration tests.
pub const TEST_DATABASE_URL_ENV: &str = "STOREFRONT_TEST_DATABASE_URL";

/// A freshly created database, dropped again when the handle goes away.
pub struct TestDatabase {
    connection_string: String,
    admin_url: String,
    database: String,
    server: Option<LocalServer>,
}

/// Server process started for one test database.
struct LocalServer {
    process: Child,
    data_dir: PathBuf,
}

impl TestDatabase {
    /// Connection string for `sqlx` or any other Postgres client.
    #[must_use]
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        let statement = format!("DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)", self.database);
        let _ = run_admin(&self.admin_url, statement);
        if let Some(server) = &mut self.server {
            let _ = server.process.kill();
            let _ = server.process.wait();
            let _ = fs::remove_dir_all(&server.data_dir);
        }
    }
}

/// Create a uniquely named test database.
///
/// Uses the server named by `STOREFRONT_TEST_DATABASE_URL` when set, otherwise
/// starts a local server. Suites should skip when this returns an error.
///
/// # Errors
///
/// Returns an error when no external URL is set and the local Postgres
/// binaries are missing or fail to start, or when the database cannot be
/// created.
pub fn start_postgres() -> Result<TestDatabase> {
    if let Ok(base_url) = std::env::var(TEST_DATABASE_URL_ENV) {
        return create_unique_database(&base_url);
    }
    start_local_postgres()
        .with_context(|| format!("{TEST_DATABASE_URL_ENV} is not set and no local server"))
}

fn start_local_postgres() -> Result<TestDatabase> {
    let binaries = PostgresBinaries::locate()?;
    let port = reserve_port()?;
    let data_dir = create_data_dir()?;

    let server = match launch(&binaries, &data_dir, port) {
        Ok(process) => LocalServer { process, data_dir },
        Err(err) => {
            let _ = fs::remove_dir_all(&data_dir);
            return Err(err);
        }
    };
    // The handle owns the server from here on so every failure path tears it down.
    let mut pending = TestDatabase {
        connection_string: String::new(),
        admin_url: String::new(),
        database: String::new(),
        server: Some(server),
    };
    wait_for_ready(&binaries.pg_isready, port)?;

    let mut created = create_unique_database(&format!(
        "postgres://postgres@127.0.0.1:{port}/postgres"
    ))?;
    created.server = pending.server.take();
    Ok(created)
}

fn launch(binaries: &PostgresBinaries, data_dir: &Path, port: u16) -> Result<Child> {
    let dir = data_dir
        .to_str()
        .context("data dir contains non-utf8 characters")?;
    let status = Command::new(&binaries.initdb)
        .args(["-D", dir, "--username=postgres", "--auth=trust"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .context("failed to run initdb")?;
    if !status.success() {
        bail!("initdb exited with failure status");
    }

    Command::new(&binaries.postgres)
        .args(["-D", dir, "-p", &port.to_string(), "-h", "127.0.0.1", "-k", dir])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("failed to start postgres process")
}

struct PostgresBinaries {
    initdb: PathBuf,
    postgres: PathBuf,
    pg_isready: PathBuf,
}

impl PostgresBinaries {
    fn locate() -> Result<Self> {
        let dirs = search_dirs(std::env::var_os("PATH").as_deref());
        Ok(Self {
            initdb: resolve_binary(&dirs, "initdb")?,
            postgres: resolve_binary(&dirs, "postgres")?,
            pg_isready: resolve_binary(&dirs, "pg_isready")?,
        })
    }
}

fn search_dirs(path: Option<&std::ffi::OsStr>) -> Vec<PathBuf> {
    // Full server installs come first so `initdb` finds its share files.
    let mut dirs = vec![
        PathBuf::from("/opt/homebrew/opt/postgresql@16/bin"),
        PathBuf::from("/usr/local/opt/postgresql@16/bin"),
    ];
    dirs.extend(path.map_or_else(Vec::new, |paths| std::env::split_paths(paths).collect()));
    dirs.extend([
        PathBuf::from("/usr/lib/postgresql/16/bin"),
        PathBuf::from("/usr/local/bin"),
        PathBuf::from("/opt/homebrew/bin"),
    ]);
    dirs
}

fn resolve_binary(dirs: &[PathBuf], name: &str) -> Result<PathBuf> {
    dirs.iter()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
        .with_context(|| format!("{name} binary is required for Postgres tests"))
}

fn reserve_port() -> Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").context("failed to reserve port")?;
    let port = listener
        .local_addr()
        .context("failed to read listener address")?
        .port();
    drop(listener);
    Ok(port)
}

fn create_data_dir() -> Result<PathBuf> {
    let base = std::env::temp_dir().join("storefront-pg");
    fs::create_dir_all(&base)
        .with_context(|| format!("failed to create base dir {}", base.display()))?;
    for attempt in 0..5 {
        let candidate = base.join(format!("{}-{attempt}", unique_database_name()));
        if !candidate.exists() {
            fs::create_dir_all(&candidate)
                .with_context(|| format!("failed to create data dir {}", candidate.display()))?;
            return Ok(candidate);
        }
    }
    bail!("failed to allocate a data directory for postgres")
}

fn wait_for_ready(pg_isready: &Path, port: u16) -> Result<()> {
    for _ in 0..50 {
        let ready = Command::new(pg_isready)
            .args(["-h", "127.0.0.1", "-p", &port.to_string(), "-U", "postgres"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|status| status.success());
        if ready {
            return Ok(());
        }
        thread::sleep(Duration::from_millis(200));
    }
    bail!("postgres process did not become ready in time")
}

fn create_unique_database(base_url: &str) -> Result<TestDatabase> {
    let parsed = Url::parse(base_url).context("invalid postgres connection url")?;
    let database = unique_database_name();

    let mut database_url = parsed.clone();
    database_url.set_path(&format!("/{database}"));

    let mut last_error = None;
    for admin_url in admin_urls(&parsed) {
        match run_admin(&admin_url, format!("CREATE DATABASE \"{database}\"")) {
            Ok(()) => {
                return Ok(TestDatabase {
                    connection_string: database_url.to_string(),
                    admin_url,
                    database,
                    server: None,
                });
            }
            Err(err) => last_error = Some(err),
        }
    }
    Err(last_error.unwrap_or_else(|| anyhow!("failed to create database")))
}

fn admin_urls(base: &Url) -> Vec<String> {
    let mut admin = base.clone();
    admin.set_path("/postgres");
    let mut urls = vec![admin.to_string()];
    if admin.path() != base.path() {
        urls.push(base.to_string());
    }
    urls
}

// The blocking client must not run on a tokio worker, so it gets its own thread.
fn run_admin(admin_url: &str, statement: String) -> Result<()> {
    if admin_url.is_empty() {
        return Ok(());
    }
    let admin = admin_url.to_string();
    thread::spawn(move || -> Result<()> {
        let config = postgres::Config::from_str(&admin)?;
        let mut client = config.connect(NoTls)?;
        client
            .simple_query(&statement)
            .map(|_| ())
            .with_context(|| format!("failed to run `{statement}`"))
    })
    .join()
    .unwrap_or_else(|_| Err(anyhow!("admin connection thread panicked")))
}

fn unique_database_name() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("storefront_test_{}_{nanos}", std::process::id())
}
