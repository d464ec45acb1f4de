//! Connection management for Redis
//!
//! This module provides the store client used by the server:
//! - `StoreClient`: the operations the rest of the crate needs from a store
//! - `ConnectionManager`: a lazily connected multiplexed Redis connection
//! - `NameCache`: user and key names fetched once for completion

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{Client, ConnectionAddr, ConnectionInfo, RedisConnectionInfo, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, info, warn};

use crate::config::ConnectionConfig;
use crate::error::{ConnectionError, ExecutionError, Result};

/// Reply to an executed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The server answered with nil
    Nil,

    /// Any other reply, rendered as text
    Value(String),
}

/// Operations needed from the backing store
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Run one command given as positional arguments
    async fn execute(&self, args: &[String]) -> Result<Reply>;

    /// List ACL user names
    async fn users(&self) -> Result<Vec<String>>;

    /// List key names from the first page of a SCAN
    async fn keys(&self, count: usize) -> Result<Vec<String>>;
}

/// Connection state information
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected yet
    Disconnected,

    /// Connected and ready
    Connected,

    /// Connection failed
    Failed(String),
}

/// Redis connection manager
///
/// The connection is opened on first use and shared afterwards.
pub struct ConnectionManager {
    /// Redis client, holds the parsed connection info
    client: Client,

    /// Established connection
    connection: OnceCell<MultiplexedConnection>,

    /// Current connection state
    state: Arc<RwLock<ConnectionState>>,

    /// Connection URL with credentials masked
    display_url: String,

    /// Connect timeout
    timeout: Duration,
}

impl ConnectionManager {
    /// Create a new connection manager
    ///
    /// # Arguments
    /// * `config` - Connection configuration
    ///
    /// # Returns
    /// * `Result<Self>` - Manager, or an error when the address cannot be parsed
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        let info = connection_info(config)?;
        let display_url = display_url(&info);

        let client = Client::open(info)
            .map_err(|e| ConnectionError::InvalidAddress(format!("{display_url}: {e}")))?;

        debug!(url = %display_url, "created redis client");

        Ok(Self {
            client,
            connection: OnceCell::new(),
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            display_url,
            timeout: Duration::from_secs(config.timeout),
        })
    }

    /// Get current connection state
    pub async fn get_state(&self) -> ConnectionState {
        self.state.read().await.clone()
    }

    /// Check if currently connected
    pub async fn is_connected(&self) -> bool {
        matches!(*self.state.read().await, ConnectionState::Connected)
    }

    /// URL of the server with credentials masked
    pub fn display_url(&self) -> &str {
        &self.display_url
    }

    /// Get the shared connection, establishing it on first use
    async fn connection(&self) -> Result<MultiplexedConnection> {
        let connection = self.connection.get_or_try_init(|| self.connect()).await?;
        Ok(connection.clone())
    }

    async fn connect(&self) -> Result<MultiplexedConnection> {
        info!(url = %self.display_url, "connecting to redis");

        let attempt =
            tokio::time::timeout(self.timeout, self.client.get_multiplexed_async_connection())
                .await;

        match attempt {
            Ok(Ok(connection)) => {
                self.set_state(ConnectionState::Connected).await;
                Ok(connection)
            }
            Ok(Err(e)) => {
                warn!(error = %e, "redis connection failed");
                self.set_state(ConnectionState::Failed(e.to_string())).await;
                Err(ConnectionError::ConnectionFailed(e.to_string()).into())
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "redis connection timed out");
                self.set_state(ConnectionState::Failed("timeout".to_string()))
                    .await;
                Err(ConnectionError::Timeout.into())
            }
        }
    }

    /// Update connection state
    async fn set_state(&self, new_state: ConnectionState) {
        *self.state.write().await = new_state;
    }
}

#[async_trait]
impl StoreClient for ConnectionManager {
    async fn execute(&self, args: &[String]) -> Result<Reply> {
        let Some((name, rest)) = args.split_first() else {
            return Err(ExecutionError::EmptyCommand.into());
        };

        let mut cmd = redis::cmd(name);
        for arg in rest {
            cmd.arg(arg);
        }

        let mut connection = self.connection().await?;
        let value: Value = cmd.query_async(&mut connection).await?;

        Ok(match value {
            Value::Nil => Reply::Nil,
            other => Reply::Value(format_value(&other)),
        })
    }

    async fn users(&self) -> Result<Vec<String>> {
        let mut connection = self.connection().await?;
        let users: Vec<String> = redis::cmd("ACL")
            .arg("USERS")
            .query_async(&mut connection)
            .await?;
        Ok(users)
    }

    async fn keys(&self, count: usize) -> Result<Vec<String>> {
        let mut connection = self.connection().await?;
        let (_cursor, keys): (String, Vec<String>) = redis::cmd("SCAN")
            .arg(0)
            .arg("COUNT")
            .arg(count)
            .query_async(&mut connection)
            .await?;
        Ok(keys)
    }
}

/// User and key names available to completion
///
/// Filled once and never refreshed.
#[derive(Debug, Clone, Default)]
pub struct NameCache {
    users: Vec<String>,
    keys: Vec<String>,
}

impl NameCache {
    pub fn new(users: Vec<String>, keys: Vec<String>) -> Self {
        Self { users, keys }
    }

    /// Fetch users and keys from the store
    pub async fn load(client: &dyn StoreClient, scan_count: usize) -> Result<Self> {
        let users = client.users().await?;
        let keys = client.keys(scan_count).await?;
        info!(users = users.len(), keys = keys.len(), "loaded name cache");
        Ok(Self { users, keys })
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

/// Default port when the address names a host only
const DEFAULT_PORT: u16 = 6379;

/// Connection parameters for the configured server.
///
/// Credentials are handed to the driver as they are, never through a URL.
pub fn connection_info(config: &ConnectionConfig) -> Result<ConnectionInfo> {
    let (host, port) = parse_address(&config.address)?;

    Ok(ConnectionInfo {
        addr: ConnectionAddr::Tcp(host, port),
        redis: RedisConnectionInfo {
            db: i64::from(config.database),
            username: config.username.clone(),
            password: config.password.clone(),
            ..RedisConnectionInfo::default()
        },
    })
}

/// Split `host[:port]` or `[v6]:port`
fn parse_address(address: &str) -> Result<(String, u16)> {
    let invalid = || ConnectionError::InvalidAddress(address.to_string());
    let trimmed = address.trim();
    if trimmed.is_empty() || trimmed.contains('/') || trimmed.contains('@') {
        return Err(invalid().into());
    }

    let (host, port) = match trimmed.strip_prefix('[') {
        Some(rest) => {
            let (host, tail) = rest.split_once(']').ok_or_else(invalid)?;
            match tail {
                "" => (host, None),
                _ => (host, Some(tail.strip_prefix(':').ok_or_else(invalid)?)),
            }
        }
        None => match trimmed.split_once(':') {
            Some((_, port)) if port.contains(':') => return Err(invalid().into()),
            Some((host, port)) => (host, Some(port)),
            None => (trimmed, None),
        },
    };

    if host.is_empty() {
        return Err(invalid().into());
    }

    let port = match port {
        Some(port) => port.parse::<u16>().map_err(|_| invalid())?,
        None => DEFAULT_PORT,
    };

    Ok((host.to_string(), port))
}

/// `redis://host:port/db` with any credentials replaced by `***`
pub fn display_url(info: &ConnectionInfo) -> String {
    let address = match &info.addr {
        ConnectionAddr::Tcp(host, port) if host.contains(':') => format!("[{host}]:{port}"),
        ConnectionAddr::Tcp(host, port) => format!("{host}:{port}"),
        other => format!("{other:?}"),
    };

    let credentials = if info.redis.username.is_some() || info.redis.password.is_some() {
        "***@"
    } else {
        ""
    };

    format!("redis://{credentials}{address}/{}", info.redis.db)
}

/// Render a reply the way it is shown to the user
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Nil => "(nil)".to_string(),
        Value::Int(n) => n.to_string(),
        Value::BulkString(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        Value::SimpleString(s) => s.clone(),
        Value::Okay => "OK".to_string(),
        Value::Double(d) => d.to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Array(items) | Value::Set(items) => {
            let parts: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", parts.join(" "))
        }
        Value::Map(pairs) => {
            let parts: Vec<String> = pairs
                .iter()
                .map(|(k, v)| format!("{}:{}", format_value(k), format_value(v)))
                .collect();
            format!("map[{}]", parts.join(" "))
        }
        other => format!("{other:?}"),
    }
}
