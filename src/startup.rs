//! Application Startup
//!
//! Backend selection, service wiring and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use redis::aio::ConnectionManager;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::application::mapper::{CountryMapper, DepartmentMapper, JobMapper, LocationMapper};
use crate::application::services::{
    CountryService, DepartmentService, EntityService, JobService, LocationService, UpdatePolicy,
};
use crate::config::{CorsSettings, SearchBackend, Settings, StoreBackend};
use crate::domain::{Country, Department, EntityRepository, Job, Location, SearchIndex};
use crate::infrastructure::repositories::{
    MemoryStore, PgCountryRepository, PgDepartmentRepository, PgJobRepository,
    PgLocationRepository,
};
use crate::infrastructure::database;
use crate::infrastructure::search::{self, MemorySearchIndex, RedisSearchIndex};
use crate::presentation::http::{handlers::health, routes};
use crate::presentation::middleware::{create_cors_layer, create_trace_layer};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub countries: Arc<dyn CountryService>,
    pub locations: Arc<dyn LocationService>,
    pub departments: Arc<dyn DepartmentService>,
    pub jobs: Arc<dyn JobService>,
    /// Present when the store is PostgreSQL; used by readiness checks.
    pub db: Option<PgPool>,
    /// Present when the search index is Redis; used by readiness checks.
    pub redis: Option<ConnectionManager>,
}

/// One search index per entity.
pub struct SearchIndexes {
    pub countries: Arc<dyn SearchIndex<Country>>,
    pub locations: Arc<dyn SearchIndex<Location>>,
    pub departments: Arc<dyn SearchIndex<Department>>,
    pub jobs: Arc<dyn SearchIndex<Job>>,
}

impl SearchIndexes {
    pub fn in_memory() -> Self {
        Self {
            countries: Arc::new(MemorySearchIndex::new()),
            locations: Arc::new(MemorySearchIndex::new()),
            departments: Arc::new(MemorySearchIndex::new()),
            jobs: Arc::new(MemorySearchIndex::new()),
        }
    }

    pub fn redis(conn: ConnectionManager, key_prefix: &str) -> Self {
        Self {
            countries: Arc::new(RedisSearchIndex::new(conn.clone(), key_prefix)),
            locations: Arc::new(RedisSearchIndex::new(conn.clone(), key_prefix)),
            departments: Arc::new(RedisSearchIndex::new(conn.clone(), key_prefix)),
            jobs: Arc::new(RedisSearchIndex::new(conn, key_prefix)),
        }
    }
}

impl AppState {
    /// Wire one entity service per repository.
    pub fn with_repositories<RC, RL, RD, RJ>(
        countries: Arc<RC>,
        locations: Arc<RL>,
        departments: Arc<RD>,
        jobs: Arc<RJ>,
        indexes: SearchIndexes,
        update_policy: UpdatePolicy,
    ) -> Self
    where
        RC: EntityRepository<Country> + 'static,
        RL: EntityRepository<Location> + 'static,
        RD: EntityRepository<Department> + 'static,
        RJ: EntityRepository<Job> + 'static,
    {
        Self {
            countries: Arc::new(
                EntityService::new(CountryMapper, countries, indexes.countries)
                    .with_update_policy(update_policy),
            ),
            locations: Arc::new(
                EntityService::new(LocationMapper, locations, indexes.locations)
                    .with_update_policy(update_policy),
            ),
            departments: Arc::new(
                EntityService::new(DepartmentMapper, departments, indexes.departments)
                    .with_update_policy(update_policy),
            ),
            jobs: Arc::new(
                EntityService::new(JobMapper, jobs, indexes.jobs).with_update_policy(update_policy),
            ),
            db: None,
            redis: None,
        }
    }

    /// Linked memory repositories over the given indexes.
    pub fn memory(indexes: SearchIndexes, update_policy: UpdatePolicy) -> Self {
        let store = MemoryStore::new();
        Self::with_repositories(
            store.countries,
            store.locations,
            store.departments,
            store.jobs,
            indexes,
            update_policy,
        )
    }

    /// Everything in process: memory repositories and memory indexes.
    pub fn in_memory(update_policy: UpdatePolicy) -> Self {
        Self::memory(SearchIndexes::in_memory(), update_policy)
    }

    /// PostgreSQL repositories sharing one pool.
    pub fn postgres(pool: PgPool, indexes: SearchIndexes, update_policy: UpdatePolicy) -> Self {
        let mut state = Self::with_repositories(
            Arc::new(PgCountryRepository::new(pool.clone())),
            Arc::new(PgLocationRepository::new(pool.clone())),
            Arc::new(PgDepartmentRepository::new(pool.clone())),
            Arc::new(PgJobRepository::new(pool.clone())),
            indexes,
            update_policy,
        );
        state.db = Some(pool);
        state
    }
}

/// Router with compression, tracing and CORS applied.
pub fn build_router(state: AppState, cors: &CorsSettings) -> Router {
    routes::create_router(state)
        .layer(CompressionLayer::new())
        .layer(create_trace_layer())
        .layer(create_cors_layer(cors))
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        health::init_server_start();

        let redis = match settings.search.backend {
            SearchBackend::Redis => {
                let conn = search::create_redis_client(&settings.search).await?;
                tracing::info!("Redis search index connected");
                Some(conn)
            }
            SearchBackend::Memory => {
                tracing::info!("Using in-memory search index");
                None
            }
        };
        let indexes = match &redis {
            Some(conn) => SearchIndexes::redis(conn.clone(), &settings.search.key_prefix),
            None => SearchIndexes::in_memory(),
        };

        let update_policy = settings.service.update_policy;
        let mut state = match settings.database.backend {
            StoreBackend::Postgres => {
                let pool = database::create_pool(&settings.database).await?;
                tracing::info!("Database connection pool created");
                if settings.database.run_migrations {
                    database::run_migrations(&pool).await?;
                    tracing::info!("Database migrations applied");
                }
                AppState::postgres(pool, indexes, update_policy)
            }
            StoreBackend::Memory => {
                tracing::info!("Using in-memory store");
                AppState::memory(indexes, update_policy)
            }
        };
        state.redis = redis;

        let router = build_router(state, &settings.cors);

        let addr = settings.server.socket_addr()?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}
