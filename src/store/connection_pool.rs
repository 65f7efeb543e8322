//! ClickHouse connection pool
//!
//! Holds one client per node for internal reads and, when
//! `CLICKHOUSE_QUERY_ROLE` is set, a second set bound to that role for
//! model-generated SQL. Clients are cheap to clone and safe to use from
//! concurrent requests.
//!
//! When `CLICKHOUSE_CLUSTER` is set, discovers cluster nodes from
//! `system.clusters` and round-robins queries across them.

use clickhouse::Client;
use serde::Deserialize;
use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Connection settings read from `CLICKHOUSE_*` environment variables
#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub urls: Vec<String>,
    pub cluster_name: Option<String>,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Role used when executing model-generated SQL
    pub query_role: Option<String>,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, String> {
        let url = env::var("CLICKHOUSE_URL").map_err(|_| "CLICKHOUSE_URL not set".to_string())?;

        Ok(Self {
            urls: vec![url],
            cluster_name: env::var("CLICKHOUSE_CLUSTER").ok(),
            user: env::var("CLICKHOUSE_USER").unwrap_or_else(|_| "default".to_string()),
            // Allow empty password for local development
            password: env::var("CLICKHOUSE_PASSWORD").unwrap_or_default(),
            database: env::var("CLICKHOUSE_DATABASE").unwrap_or_else(|_| "default".to_string()),
            query_role: env::var("CLICKHOUSE_QUERY_ROLE")
                .ok()
                .filter(|role| !role.trim().is_empty()),
        })
    }

    /// Discover cluster nodes from `system.clusters` using the seed URL.
    /// Falls back to the seed URL with a warning if discovery fails or returns empty.
    async fn discover_cluster_nodes(&mut self) {
        let cluster_name = match &self.cluster_name {
            Some(name) => name.clone(),
            None => return,
        };

        let seed_url = &self.urls[0];
        log::info!(
            "Discovering cluster '{}' nodes from seed: {}",
            cluster_name,
            seed_url
        );

        #[derive(Debug, clickhouse::Row, Deserialize)]
        struct ClusterNode {
            host_address: String,
            port: u16,
        }

        let client = self.create_client_for_url(seed_url, None);

        let result = client
            .query("SELECT host_address, port FROM system.clusters WHERE cluster = ? ORDER BY host_address, port")
            .bind(&cluster_name)
            .fetch_all::<ClusterNode>()
            .await;

        match result {
            Ok(rows) => {
                let scheme = if seed_url.starts_with("https://") {
                    "https"
                } else {
                    "http"
                };

                let discovered_urls: Vec<String> = rows
                    .into_iter()
                    .map(|node| format!("{}://{}:{}", scheme, node.host_address, node.port))
                    .collect();

                if discovered_urls.is_empty() {
                    log::warn!(
                        "Cluster '{}' returned no nodes, falling back to seed URL",
                        cluster_name
                    );
                } else {
                    log::info!(
                        "Discovered {} nodes for cluster '{}'",
                        discovered_urls.len(),
                        cluster_name
                    );
                    self.urls = discovered_urls;
                }
            }
            Err(e) => {
                log::warn!(
                    "Failed to discover cluster '{}' nodes: {}. Falling back to seed URL",
                    cluster_name,
                    e
                );
            }
        }
    }

    fn create_client_for_url(&self, url: &str, role: Option<&str>) -> Client {
        let mut client = Client::default()
            .with_url(url)
            .with_user(&self.user)
            .with_password(&self.password)
            .with_database(&self.database)
            .with_option("join_use_nulls", "1");

        // Adds the role parameter to every HTTP request from this client
        if let Some(role_name) = role {
            log::debug!("Creating query clients with role: {}", role_name);
            client = client.with_option("role", role_name);
        }

        client
    }
}

pub struct ConnectionPool {
    default_clients: Vec<Client>,
    query_clients: Vec<Client>,
    config: StoreConfig,
    round_robin: AtomicUsize,
}

impl ConnectionPool {
    /// Create the pool. If `cluster_name` is set, queries the seed node to discover members.
    pub async fn new(mut config: StoreConfig) -> Self {
        if config.cluster_name.is_some() {
            config.discover_cluster_nodes().await;
        }

        let default_clients: Vec<Client> = config
            .urls
            .iter()
            .map(|url| config.create_client_for_url(url, None))
            .collect();

        let query_clients: Vec<Client> = match config.query_role.as_deref() {
            Some(role) => config
                .urls
                .iter()
                .map(|url| config.create_client_for_url(url, Some(role)))
                .collect(),
            None => default_clients.clone(),
        };

        let mode = if let Some(ref name) = config.cluster_name {
            format!(
                "Cluster mode: {} nodes for cluster '{}'",
                default_clients.len(),
                name
            )
        } else {
            "Single-node mode".to_string()
        };
        log::info!("{}", mode);

        Self {
            default_clients,
            query_clients,
            config,
            round_robin: AtomicUsize::new(0),
        }
    }

    /// Wrap an already-built client, e.g. one pointed at a mock server.
    pub fn from_client(client: Client) -> Self {
        Self {
            default_clients: vec![client.clone()],
            query_clients: vec![client],
            config: StoreConfig {
                urls: vec![],
                cluster_name: None,
                user: String::new(),
                password: String::new(),
                database: String::new(),
                query_role: None,
            },
            round_robin: AtomicUsize::new(0),
        }
    }

    fn next_index(&self) -> usize {
        self.round_robin.fetch_add(1, Ordering::Relaxed) % self.default_clients.len()
    }

    /// Client for catalog reads and content sampling
    pub fn default_client(&self) -> Client {
        self.default_clients[self.next_index()].clone()
    }

    /// Client for model-generated SQL (role-bound when configured)
    pub fn query_client(&self) -> Client {
        self.query_clients[self.next_index()].clone()
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            node_count: self.default_clients.len(),
            cluster_name: self.config.cluster_name.clone(),
            query_role: self.config.query_role.clone(),
        }
    }
}

#[derive(Debug)]
pub struct PoolStats {
    pub node_count: usize,
    pub cluster_name: Option<String>,
    pub query_role: Option<String>,
}
