//! PostgreSQL-backed `RecordStore`: transactional get-or-insert over the
//! normalized tenant/service/environment/endpoint hierarchy.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{CreateOutcome, EndpointRecord, RecordStore, RecordStoreError, ToggleOutcome};
use crate::domain::route_identifier::RouteIdentifier;

use super::diesel_error::{diesel_error_message, pool_error_message};
use super::models::{
    EndpointActiveUpdate, EndpointRow, NewEndpointRow, NewEnvironmentRow, NewServiceRow,
    NewTenantRow,
};
use super::pool::DbPool;
use super::schema::{endpoints, environments, services, tenants};

/// Diesel-backed implementation of the record store port.
#[derive(Clone)]
pub struct DieselRecordStore {
    pool: DbPool,
}

impl DieselRecordStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn get_or_insert_tenant(
        conn: &mut AsyncPgConnection,
        name: &str,
    ) -> Result<Uuid, diesel::result::Error> {
        diesel::insert_into(tenants::table)
            .values(NewTenantRow {
                id: Uuid::new_v4(),
                name,
                created_at: Utc::now(),
            })
            .on_conflict(tenants::name)
            .do_update()
            .set(tenants::name.eq(excluded(tenants::name)))
            .returning(tenants::id)
            .get_result(conn)
            .await
    }

    async fn get_or_insert_service(
        conn: &mut AsyncPgConnection,
        tenant_id: Uuid,
        name: &str,
    ) -> Result<Uuid, diesel::result::Error> {
        diesel::insert_into(services::table)
            .values(NewServiceRow {
                id: Uuid::new_v4(),
                tenant_id,
                name,
                created_at: Utc::now(),
            })
            .on_conflict((services::tenant_id, services::name))
            .do_update()
            .set(services::name.eq(excluded(services::name)))
            .returning(services::id)
            .get_result(conn)
            .await
    }

    async fn get_or_insert_environment(
        conn: &mut AsyncPgConnection,
        service_id: Uuid,
        name: &str,
    ) -> Result<Uuid, diesel::result::Error> {
        diesel::insert_into(environments::table)
            .values(NewEnvironmentRow {
                id: Uuid::new_v4(),
                service_id,
                name,
                created_at: Utc::now(),
            })
            .on_conflict((environments::service_id, environments::name))
            .do_update()
            .set(environments::name.eq(excluded(environments::name)))
            .returning(environments::id)
            .get_result(conn)
            .await
    }

    async fn resolve_environment(
        conn: &mut AsyncPgConnection,
        identifier: &RouteIdentifier,
    ) -> Result<Uuid, diesel::result::Error> {
        let tenant_id = Self::get_or_insert_tenant(conn, identifier.tenant()).await?;
        let service_id = Self::get_or_insert_service(conn, tenant_id, identifier.service()).await?;
        Self::get_or_insert_environment(conn, service_id, identifier.env()).await
    }

    fn row_to_record(identifier: &RouteIdentifier, row: EndpointRow) -> EndpointRecord {
        EndpointRecord {
            identifier: identifier.clone(),
            url: row.url,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    /// `create` never implicitly reactivates: an inactive row is a
    /// `Conflict` even with a matching URL (spec Open Question 1).
    fn classify_existing(identifier: &RouteIdentifier, row: EndpointRow, url: &str) -> CreateOutcome {
        if row.url == url && row.is_active {
            CreateOutcome::AlreadyExists(Self::row_to_record(identifier, row))
        } else {
            CreateOutcome::Conflict {
                existing_url: row.url,
            }
        }
    }
}

fn map_pool_error(error: super::pool::PoolError) -> RecordStoreError {
    RecordStoreError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, context: &str) -> RecordStoreError {
    let (is_connection, message) = diesel_error_message(error, context);
    if is_connection {
        RecordStoreError::connection(message)
    } else {
        RecordStoreError::fatal(message)
    }
}

#[async_trait]
impl RecordStore for DieselRecordStore {
    async fn create_endpoint(
        &self,
        identifier: &RouteIdentifier,
        url: &str,
    ) -> Result<CreateOutcome, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let identifier = identifier.clone();
        let url = url.to_owned();

        conn.transaction(|conn| {
            async move {
                let environment_id = Self::resolve_environment(conn, &identifier).await?;
                let now = Utc::now();

                let existing: Option<EndpointRow> = endpoints::table
                    .filter(endpoints::environment_id.eq(environment_id))
                    .filter(endpoints::version.eq(&identifier.version()))
                    .select(EndpointRow::as_select())
                    .first(conn)
                    .await
                    .optional()?;

                if let Some(row) = existing {
                    return Ok(Self::classify_existing(&identifier, row, &url));
                }

                // Two concurrent creates for the same identifier both pass the
                // existence check above before either commits; the unique
                // constraint on (environment_id, version) is the real guard, so
                // a losing insert here is a normal outcome, not an error.
                let inserted: Option<EndpointRow> = diesel::insert_into(endpoints::table)
                    .values(NewEndpointRow {
                        id: Uuid::new_v4(),
                        environment_id,
                        version: identifier.version(),
                        url: &url,
                        is_active: true,
                        created_at: now,
                        updated_at: now,
                    })
                    .on_conflict((endpoints::environment_id, endpoints::version))
                    .do_nothing()
                    .returning(EndpointRow::as_select())
                    .get_result(conn)
                    .await
                    .optional()?;

                match inserted {
                    Some(row) => Ok(CreateOutcome::Created(Self::row_to_record(&identifier, row))),
                    None => {
                        let row: EndpointRow = endpoints::table
                            .filter(endpoints::environment_id.eq(environment_id))
                            .filter(endpoints::version.eq(&identifier.version()))
                            .select(EndpointRow::as_select())
                            .first(conn)
                            .await?;
                        Ok(Self::classify_existing(&identifier, row, &url))
                    }
                }
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_diesel_error(err, "create_endpoint"))
    }

    async fn activate_endpoint(
        &self,
        identifier: &RouteIdentifier,
    ) -> Result<ToggleOutcome, RecordStoreError> {
        self.toggle_endpoint(identifier, true).await
    }

    async fn deactivate_endpoint(
        &self,
        identifier: &RouteIdentifier,
    ) -> Result<ToggleOutcome, RecordStoreError> {
        self.toggle_endpoint(identifier, false).await
    }

    async fn find_active_endpoint(
        &self,
        identifier: &RouteIdentifier,
    ) -> Result<Option<EndpointRecord>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<EndpointRow> = environments::table
            .inner_join(services::table.inner_join(tenants::table))
            .inner_join(endpoints::table.on(endpoints::environment_id.eq(environments::id)))
            .filter(tenants::name.eq(identifier.tenant()))
            .filter(services::name.eq(identifier.service()))
            .filter(environments::name.eq(identifier.env()))
            .filter(endpoints::version.eq(identifier.version()))
            .filter(endpoints::is_active.eq(true))
            .select(EndpointRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find_active_endpoint"))?;

        Ok(row.map(|row| Self::row_to_record(identifier, row)))
    }
}

impl DieselRecordStore {
    async fn toggle_endpoint(
        &self,
        identifier: &RouteIdentifier,
        active: bool,
    ) -> Result<ToggleOutcome, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let identifier = identifier.clone();

        conn.transaction(|conn| {
            async move {
                let environment_id = match Self::find_environment_id(conn, &identifier).await? {
                    Some(id) => id,
                    None => return Ok(ToggleOutcome::NotFound),
                };

                let existing: Option<EndpointRow> = endpoints::table
                    .filter(endpoints::environment_id.eq(environment_id))
                    .filter(endpoints::version.eq(identifier.version()))
                    .select(EndpointRow::as_select())
                    .first(conn)
                    .await
                    .optional()?;

                let Some(row) = existing else {
                    return Ok(ToggleOutcome::NotFound);
                };

                if row.is_active == active {
                    return Ok(ToggleOutcome::AlreadyInState(Self::row_to_record(
                        &identifier,
                        row,
                    )));
                }

                let previous_active = row.is_active;
                let updated: EndpointRow = diesel::update(endpoints::table.find(row.id))
                    .set(EndpointActiveUpdate {
                        is_active: active,
                        updated_at: Utc::now(),
                    })
                    .returning(EndpointRow::as_select())
                    .get_result(conn)
                    .await?;

                Ok(ToggleOutcome::Applied {
                    record: Self::row_to_record(&identifier, updated),
                    previous_active,
                })
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_diesel_error(err, "toggle_endpoint"))
    }

    async fn find_environment_id(
        conn: &mut AsyncPgConnection,
        identifier: &RouteIdentifier,
    ) -> Result<Option<Uuid>, diesel::result::Error> {
        environments::table
            .inner_join(services::table.inner_join(tenants::table))
            .filter(tenants::name.eq(identifier.tenant()))
            .filter(services::name.eq(identifier.service()))
            .filter(environments::name.eq(identifier.env()))
            .select(environments::id)
            .first(conn)
            .await
            .optional()
    }
}
