//! Diesel table definitions for the normalized route schema (`spec.md` §6).

diesel::table! {
    tenants (id) {
        id -> Uuid,
        name -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    services (id) {
        id -> Uuid,
        tenant_id -> Uuid,
        name -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    environments (id) {
        id -> Uuid,
        service_id -> Uuid,
        name -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    endpoints (id) {
        id -> Uuid,
        environment_id -> Uuid,
        version -> Text,
        url -> Text,
        is_active -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    audit_documents (id) {
        id -> Uuid,
        event_id -> Uuid,
        action -> Text,
        tenant -> Text,
        service -> Text,
        env -> Text,
        version -> Text,
        url -> Text,
        previous_url -> Nullable<Text>,
        previous_state -> Nullable<Text>,
        changed_by -> Nullable<Text>,
        occurred_at -> Timestamptz,
        processed_at -> Timestamptz,
        correlation_id -> Text,
        metadata -> Jsonb,
    }
}

diesel::joinable!(services -> tenants (tenant_id));
diesel::joinable!(environments -> services (service_id));
diesel::joinable!(endpoints -> environments (environment_id));

diesel::allow_tables_to_appear_in_same_query!(
    audit_documents,
    endpoints,
    environments,
    services,
    tenants,
);
