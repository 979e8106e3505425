use rusqlite::Connection;
use tunecart_core::db::open_db_in_memory;
use tunecart_core::{
    Actor, BandDraft, CatalogService, DecisionReason, GenreDraft, PaymentDraft, PaymentService,
    QueryError, RawQuery, RecordDraft, RecordId, Role, ScopePolicy, ServiceError,
    SqliteCatalogRepository, SqlitePaymentRepository,
};
use uuid::Uuid;

fn admin() -> Actor {
    Actor::new(Uuid::new_v4(), Role::Admin)
}

fn user() -> Actor {
    Actor::new(Uuid::new_v4(), Role::User)
}

fn raw(pairs: &[(&str, &str)]) -> RawQuery {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn payment_service(
    conn: &Connection,
    policy: ScopePolicy,
) -> PaymentService<SqlitePaymentRepository<'_>, SqliteCatalogRepository<'_>> {
    PaymentService::new(
        SqlitePaymentRepository::try_new(conn).unwrap(),
        SqliteCatalogRepository::try_new(conn).unwrap(),
        policy,
    )
}

fn seed_record(conn: &Connection, admin: &Actor) -> RecordId {
    let catalog = CatalogService::new(SqliteCatalogRepository::try_new(conn).unwrap());
    let genre = catalog
        .create_genre(
            admin,
            &GenreDraft {
                name: "grind".to_string(),
                description: None,
            },
        )
        .unwrap();
    let band = catalog
        .create_band(
            admin,
            &BandDraft {
                name: "Discordance Axis".to_string(),
                genre_id: genre.id,
                formed_year: Some(1992),
            },
        )
        .unwrap();
    catalog
        .create_record(
            admin,
            &RecordDraft {
                title: "The Inalienable Dreamless".to_string(),
                band_id: band.id,
                genre_id: genre.id,
                price_cents: 1800,
                released_year: Some(2000),
            },
        )
        .unwrap()
        .id
}

fn seed_payment(
    service: &PaymentService<SqlitePaymentRepository<'_>, SqliteCatalogRepository<'_>>,
    owner: &Actor,
    record_id: RecordId,
    amount_cents: i64,
) -> Uuid {
    service
        .create_payment(
            owner,
            &PaymentDraft {
                owner_id: owner.id,
                record_id,
                amount_cents,
            },
        )
        .unwrap()
        .id
}

#[test]
fn inject_policy_scopes_unfiltered_user_lists_to_self() {
    let conn = open_db_in_memory().unwrap();
    let admin = admin();
    let u1 = user();
    let u2 = user();
    let record_id = seed_record(&conn, &admin);
    let service = payment_service(&conn, ScopePolicy::InjectOwner);

    let own = seed_payment(&service, &u1, record_id, 1800);
    seed_payment(&service, &u2, record_id, 1800);

    let listed = service.list_payments(&u1, &raw(&[])).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, own);
    assert_eq!(listed[0].owner_id, u1.id);
}

#[test]
fn require_policy_denies_unfiltered_user_lists() {
    let conn = open_db_in_memory().unwrap();
    let admin = admin();
    let u1 = user();
    let record_id = seed_record(&conn, &admin);
    let service = payment_service(&conn, ScopePolicy::RequireOwnerFilter);
    seed_payment(&service, &u1, record_id, 1800);

    let err = service.list_payments(&u1, &raw(&[])).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Unauthorized(DecisionReason::MissingOwnerFilter)
    ));

    // An explicit self filter satisfies the same policy.
    let listed = service
        .list_payments(&u1, &raw(&[("owner_id", &u1.id.to_string())]))
        .unwrap();
    assert_eq!(listed.len(), 1);
}

#[test]
fn user_cannot_list_foreign_owner_scope_under_either_policy() {
    let conn = open_db_in_memory().unwrap();
    let admin = admin();
    let u1 = user();
    let u2 = user();
    seed_record(&conn, &admin);

    for policy in [ScopePolicy::InjectOwner, ScopePolicy::RequireOwnerFilter] {
        let service = payment_service(&conn, policy);
        let err = service
            .list_payments(&u1, &raw(&[("owner_id", &u2.id.to_string())]))
            .unwrap_err();
        assert!(
            matches!(err, ServiceError::Unauthorized(DecisionReason::NotOwner)),
            "policy {policy:?} must deny a foreign owner filter"
        );
    }
}

#[test]
fn admin_lists_are_unscoped() {
    let conn = open_db_in_memory().unwrap();
    let admin = admin();
    let u1 = user();
    let u2 = user();
    let record_id = seed_record(&conn, &admin);
    let service = payment_service(&conn, ScopePolicy::InjectOwner);

    seed_payment(&service, &u1, record_id, 1000);
    seed_payment(&service, &u2, record_id, 2000);

    let listed = service.list_payments(&admin, &raw(&[])).unwrap();
    assert_eq!(listed.len(), 2);

    // Admin may also scope to one owner explicitly.
    let scoped = service
        .list_payments(&admin, &raw(&[("owner_id", &u2.id.to_string())]))
        .unwrap();
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].owner_id, u2.id);
}

#[test]
fn negative_limit_is_a_validation_error_not_a_denial() {
    let conn = open_db_in_memory().unwrap();
    let admin = admin();
    let u1 = user();
    seed_record(&conn, &admin);
    let service = payment_service(&conn, ScopePolicy::RequireOwnerFilter);

    // Under RequireOwnerFilter this unfiltered list would be denied, but the
    // malformed limit must fail first: the decision is never invoked.
    let err = service
        .list_payments(&u1, &raw(&[("limit", "-1")]))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Query(QueryError::InvalidLimit(_))
    ));
}

#[test]
fn unrecognized_filter_fields_are_dropped() {
    let conn = open_db_in_memory().unwrap();
    let admin = admin();
    let u1 = user();
    let record_id = seed_record(&conn, &admin);
    let service = payment_service(&conn, ScopePolicy::InjectOwner);
    seed_payment(&service, &u1, record_id, 1800);

    let listed = service
        .list_payments(&u1, &raw(&[("label", "earache"), ("price_max", "9000")]))
        .unwrap();
    assert_eq!(listed.len(), 1);
}

#[test]
fn status_filter_and_sort_with_pagination() {
    let conn = open_db_in_memory().unwrap();
    let admin = admin();
    let u1 = user();
    let record_id = seed_record(&conn, &admin);
    let service = payment_service(&conn, ScopePolicy::InjectOwner);

    for amount in [300, 100, 200] {
        seed_payment(&service, &u1, record_id, amount);
    }

    let pending = service
        .list_payments(
            &u1,
            &raw(&[("status", "pending"), ("sort_by", "amount_cents:asc")]),
        )
        .unwrap();
    assert_eq!(
        pending.iter().map(|p| p.amount_cents).collect::<Vec<_>>(),
        vec![100, 200, 300]
    );

    let page_two = service
        .list_payments(
            &u1,
            &raw(&[
                ("sort_by", "amount_cents:asc"),
                ("limit", "2"),
                ("page", "2"),
            ]),
        )
        .unwrap();
    assert_eq!(page_two.len(), 1);
    assert_eq!(page_two[0].amount_cents, 300);

    let completed = service
        .list_payments(&u1, &raw(&[("status", "completed")]))
        .unwrap();
    assert!(completed.is_empty());
}

#[test]
fn repeated_lists_with_identical_input_return_identical_pages() {
    let conn = open_db_in_memory().unwrap();
    let admin = admin();
    let u1 = user();
    let record_id = seed_record(&conn, &admin);
    let service = payment_service(&conn, ScopePolicy::InjectOwner);

    for amount in [500, 400, 600] {
        seed_payment(&service, &u1, record_id, amount);
    }

    let input = raw(&[("sort_by", "amount_cents:desc"), ("limit", "2")]);
    let first = service.list_payments(&u1, &input).unwrap();
    let second = service.list_payments(&u1, &input).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.iter().map(|p| p.amount_cents).collect::<Vec<_>>(),
        vec![600, 500]
    );
}
