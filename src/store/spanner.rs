use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gcloud_gax::grpc::Code;
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::v1::Mutation;
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::client::{Client, ClientConfig, Error as SpannerError};
use gcloud_spanner::key::Key;
use gcloud_spanner::mutation::{delete, insert, update};
use gcloud_spanner::row::Row;
use gcloud_spanner::statement::{Statement, ToKind};
use gcloud_spanner::value::CommitTimestamp;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DocumentStore, SpannerDatabase};
use crate::models::{Author, BlogPost, BlogPostPatch, NewBlogPost};

const TABLE: &str = "blog_posts";

const SELECT_COLUMNS: &str = "SELECT id, title, content, author_first_name, author_last_name, \
     FORMAT_TIMESTAMP('%Y-%m-%dT%H:%M:%E*SZ', created, 'UTC') AS created FROM blog_posts";

/// Blog post store backed by a Cloud Spanner table.
///
/// The client sits behind a lock so `close` can take it out while handlers
/// still hold the shared store handle; operations after `close` fail.
pub struct SpannerStore {
    client: RwLock<Option<Client>>,
    database_path: String,
}

impl SpannerStore {
    /// Connect to the given database, provisioning it first if needed.
    ///
    /// The gcloud-spanner library detects `SPANNER_EMULATOR_HOST` and talks to
    /// the emulator when set, or production Spanner otherwise.
    pub async fn connect(database: &SpannerDatabase) -> Result<Self> {
        let emulator_host = std::env::var("SPANNER_EMULATOR_HOST").ok();

        auto_provision(database, emulator_host.is_some()).await?;

        let database_path = database.database_path();

        match &emulator_host {
            Some(host) => tracing::info!("Connecting to Spanner emulator at: {}", host),
            None => tracing::info!("Connecting to production Spanner"),
        }

        let client = Client::new(&database_path, ClientConfig::default())
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!(
            "Successfully connected to Spanner database: {}",
            database_path
        );

        Ok(Self {
            client: RwLock::new(Some(client)),
            database_path,
        })
    }

    async fn query_posts(&self, statement: Statement) -> Result<Vec<BlogPost>> {
        let guard = self.client.read().await;
        let client = guard.as_ref().context("Spanner connection is closed")?;

        let mut tx = client
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query blog posts from Spanner")?;

        let mut posts = Vec::new();
        while let Some(row) = result_set.next().await? {
            posts.push(post_from_row(&row)?);
        }
        Ok(posts)
    }

    /// Apply one mutation. `Ok(false)` means Spanner reported the row missing.
    async fn apply(&self, mutation: Mutation, action: &str) -> Result<bool> {
        let guard = self.client.read().await;
        let client = guard.as_ref().context("Spanner connection is closed")?;

        match client.apply(vec![mutation]).await {
            Ok(_) => Ok(true),
            Err(e) if is_not_found(&e) => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to {} in Spanner", action)),
        }
    }
}

fn is_not_found(err: &SpannerError) -> bool {
    matches!(err, SpannerError::GRPC(status) if status.code() == Code::NotFound)
}

fn post_from_row(row: &Row) -> Result<BlogPost> {
    let created_str: String = row.column_by_name("created")?;
    let created = DateTime::parse_from_rfc3339(&created_str)
        .context("Failed to parse created timestamp")?
        .with_timezone(&Utc);

    Ok(BlogPost {
        id: row.column_by_name("id")?,
        title: row.column_by_name("title")?,
        content: row.column_by_name("content")?,
        author: Author {
            first_name: row.column_by_name("author_first_name")?,
            last_name: row.column_by_name("author_last_name")?,
        },
        created,
    })
}

#[async_trait]
impl DocumentStore for SpannerStore {
    async fn insert(&self, post: NewBlogPost) -> Result<BlogPost> {
        let id = Uuid::new_v4().to_string();

        let mutation = insert(
            TABLE,
            &[
                "id",
                "title",
                "content",
                "author_first_name",
                "author_last_name",
                "created",
            ],
            &[
                &id,
                &post.title,
                &post.content,
                &post.author.first_name,
                &post.author.last_name,
                &CommitTimestamp::new(),
            ],
        );
        if !self.apply(mutation, "insert blog post").await? {
            bail!("Spanner rejected insert of post {}", id);
        }

        tracing::debug!("Inserted post with id: {}", id);

        // `created` is the commit timestamp, so read the row back
        match self.find_by_id(&id).await? {
            Some(post) => Ok(post),
            None => bail!("Inserted post {} could not be read back", id),
        }
    }

    async fn find_all(&self, limit: i64) -> Result<Vec<BlogPost>> {
        let mut statement = Statement::new(format!(
            "{} ORDER BY created ASC, id ASC LIMIT @limit",
            SELECT_COLUMNS
        ));
        statement.add_param("limit", &limit);

        let posts = self.query_posts(statement).await?;
        tracing::debug!("Listed {} posts (limit: {})", posts.len(), limit);
        Ok(posts)
    }

    async fn find_one(&self) -> Result<Option<BlogPost>> {
        let statement = Statement::new(format!(
            "{} ORDER BY created ASC, id ASC LIMIT 1",
            SELECT_COLUMNS
        ));
        Ok(self.query_posts(statement).await?.into_iter().next())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<BlogPost>> {
        let mut statement = Statement::new(format!("{} WHERE id = @id", SELECT_COLUMNS));
        statement.add_param("id", &id.to_string());

        let post = self.query_posts(statement).await?.into_iter().next();
        if post.is_none() {
            tracing::debug!("Post not found with id: {}", id);
        }
        Ok(post)
    }

    async fn update_by_id(&self, id: &str, patch: BlogPostPatch) -> Result<Option<BlogPost>> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        if patch.is_empty() {
            return Ok(Some(existing));
        }

        // Built in its own scope: `&dyn ToKind` must not live across an await
        let mutation = {
            let id_str = id.to_string();
            let mut columns: Vec<&str> = vec!["id"];
            let mut values: Vec<&dyn ToKind> = vec![&id_str];

            if let Some(title) = &patch.title {
                columns.push("title");
                values.push(title);
            }
            if let Some(content) = &patch.content {
                columns.push("content");
                values.push(content);
            }
            if let Some(author) = &patch.author {
                columns.push("author_first_name");
                values.push(&author.first_name);
                columns.push("author_last_name");
                values.push(&author.last_name);
            }

            update(TABLE, &columns, &values)
        };
        if !self.apply(mutation, "update blog post").await? {
            // Deleted between the read and the write
            tracing::debug!("Post vanished before update: {}", id);
            return Ok(None);
        }

        tracing::debug!("Updated post with id: {}", id);
        self.find_by_id(id).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        let mutation = delete(TABLE, Key::new(&id.to_string()));
        self.apply(mutation, "delete blog post").await?;

        tracing::debug!("Deleted post with id: {}", id);
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        let guard = self.client.read().await;
        let client = guard.as_ref().context("Spanner connection is closed")?;

        let mut tx = client
            .single()
            .await
            .context("Failed to create read transaction for count")?;

        let mut result_set = tx
            .query(Statement::new("SELECT COUNT(*) AS count FROM blog_posts"))
            .await
            .context("Failed to execute count query")?;

        match result_set.next().await? {
            Some(row) => Ok(row.column_by_name("count")?),
            None => Ok(0),
        }
    }

    /// Executes `SELECT 1` to verify the connection is alive
    async fn health_check(&self) -> Result<()> {
        let guard = self.client.read().await;
        let client = guard.as_ref().context("Spanner connection is closed")?;

        let mut tx = client
            .single()
            .await
            .context("Failed to create health check transaction")?;

        let mut result_set = tx
            .query(Statement::new("SELECT 1"))
            .await
            .context("Failed to execute health check query")?;

        if result_set.next().await?.is_some() {
            tracing::debug!("Health check query succeeded");
            Ok(())
        } else {
            Err(anyhow::anyhow!("Health check query returned no results"))
        }
    }

    async fn close(&self) {
        if let Some(client) = self.client.write().await.take() {
            client.close().await;
            tracing::info!("Closed Spanner connection to {}", self.database_path);
        }
    }
}

/// Create the Spanner instance, database and table when they don't exist.
///
/// Enables zero-setup local development against the emulator.
async fn auto_provision(database: &SpannerDatabase, emulator: bool) -> Result<()> {
    tracing::info!("Starting auto-provisioning checks...");

    let admin_client = AdminClient::new(AdminClientConfig::default())
        .await
        .context("Failed to create Spanner admin client")?;

    ensure_instance_exists(&admin_client, database, emulator).await?;
    ensure_database_exists(&admin_client, database).await?;
    ensure_table_exists(&admin_client, &database.database_path()).await?;

    tracing::info!("Auto-provisioning complete");
    Ok(())
}

async fn ensure_instance_exists(
    admin_client: &AdminClient,
    database: &SpannerDatabase,
    emulator: bool,
) -> Result<()> {
    let project_path = database.project_path();
    let instance_path = database.instance_path();

    let get_request = GetInstanceRequest {
        name: instance_path.clone(),
        field_mask: None,
    };

    match admin_client.instance().get_instance(get_request, None).await {
        Ok(_) => {
            tracing::info!("Instance already exists: {}", instance_path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("Instance not found, creating: {}", instance_path);

            let instance_config = if emulator {
                format!("{}/instanceConfigs/emulator-config", project_path)
            } else {
                format!("{}/instanceConfigs/regional-us-central1", project_path)
            };

            let create_request = CreateInstanceRequest {
                parent: project_path.clone(),
                instance_id: database.instance.clone(),
                instance: Some(Instance {
                    name: instance_path.clone(),
                    config: instance_config,
                    display_name: format!("{} instance", database.instance),
                    node_count: 1,
                    ..Default::default()
                }),
            };

            let mut operation = admin_client
                .instance()
                .create_instance(create_request, None)
                .await
                .context("Failed to start instance creation")?;

            operation
                .wait(None)
                .await
                .context("Failed to create instance")?;

            tracing::info!("Instance created successfully: {}", instance_path);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to check instance existence: {}",
            e.message()
        )),
    }
}

async fn ensure_database_exists(admin_client: &AdminClient, database: &SpannerDatabase) -> Result<()> {
    let database_path = database.database_path();

    let get_request = GetDatabaseRequest {
        name: database_path.clone(),
    };

    match admin_client
        .database()
        .get_database(get_request, None)
        .await
    {
        Ok(_) => {
            tracing::info!("Database already exists: {}", database_path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("Database not found, creating: {}", database_path);

            let create_request = CreateDatabaseRequest {
                parent: database.instance_path(),
                create_statement: format!("CREATE DATABASE `{}`", database.database),
                extra_statements: vec![],
                encryption_config: None,
                database_dialect: 1, // Google Standard SQL
                proto_descriptors: vec![],
            };

            let mut operation = admin_client
                .database()
                .create_database(create_request, None)
                .await
                .context("Failed to start database creation")?;

            operation
                .wait(None)
                .await
                .context("Failed to create database")?;

            tracing::info!("Database created successfully: {}", database_path);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to check database existence: {}",
            e.message()
        )),
    }
}

async fn ensure_table_exists(admin_client: &AdminClient, database_path: &str) -> Result<()> {
    let get_ddl_request = GetDatabaseDdlRequest {
        database: database_path.to_string(),
    };

    let ddl_response = admin_client
        .database()
        .get_database_ddl(get_ddl_request, None)
        .await
        .context("Failed to get database DDL")?;

    let table_exists = ddl_response.into_inner().statements.iter().any(|stmt| {
        stmt.contains("CREATE TABLE blog_posts") || stmt.contains("CREATE TABLE `blog_posts`")
    });

    if table_exists {
        tracing::info!("Table '{}' already exists", TABLE);
        return Ok(());
    }

    tracing::info!("Table '{}' not found, creating...", TABLE);

    let create_table_ddl = r#"
CREATE TABLE blog_posts (
    id STRING(36) NOT NULL,
    title STRING(MAX) NOT NULL,
    content STRING(MAX) NOT NULL,
    author_first_name STRING(MAX),
    author_last_name STRING(MAX),
    created TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),
) PRIMARY KEY (id)
"#
    .trim()
    .to_string();

    let update_request = UpdateDatabaseDdlRequest {
        database: database_path.to_string(),
        statements: vec![create_table_ddl],
        operation_id: String::new(),
        proto_descriptors: vec![],
        throughput_mode: false,
    };

    let mut operation = admin_client
        .database()
        .update_database_ddl(update_request, None)
        .await
        .context("Failed to start table creation")?;

    operation
        .wait(None)
        .await
        .context("Failed to create table")?;

    tracing::info!("Table '{}' created successfully", TABLE);
    Ok(())
}
