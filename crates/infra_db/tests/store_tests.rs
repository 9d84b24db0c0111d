//! PostgreSQL store integration tests
//!
//! These start a PostgreSQL container and are ignored by default:
//! `cargo test -p infra_db -- --ignored`

use std::sync::Arc;

use rust_decimal_macros::dec;

use core_kernel::{HealthCheckable, UserId};
use domain_claims::ClaimStatus;
use domain_identity::{Actor, Argon2Hasher, UserRole};
use domain_lifecycle::{
    AccountService, ClaimFilter, ErrorKind, InsuranceStore, IssuePolicy, LifecycleManager, Lock,
    ManagerConfig, Page, PlanCatalog, RandomNumberGenerator, RecordQueries,
};
use domain_policy::{PaymentFrequency, PolicyStatus};
use infra_db::PostgresInsuranceStore;
use test_utils::{
    assert_error_kind, assert_split_balances, ClaimFixtures, DateFixtures, PaymentFixtures,
    PlanFixtures, TestDatabase, UserFixtures,
};

struct Services {
    store: Arc<dyn InsuranceStore>,
    accounts: AccountService,
    catalog: PlanCatalog,
    manager: LifecycleManager,
    queries: RecordQueries,
}

fn services(db: &TestDatabase) -> Services {
    let store: Arc<dyn InsuranceStore> = Arc::new(PostgresInsuranceStore::new(db.pool().clone()));
    let hasher = Argon2Hasher::with_params(1024, 1, 1).unwrap();
    Services {
        accounts: AccountService::new(store.clone(), Arc::new(hasher)),
        catalog: PlanCatalog::new(store.clone()),
        manager: LifecycleManager::new(
            store.clone(),
            Arc::new(RandomNumberGenerator),
            ManagerConfig::default(),
        ),
        queries: RecordQueries::new(store.clone()),
        store,
    }
}

/// Registers a user and returns its actor with the stored role
async fn register(s: &Services, handle: &str, role: UserRole) -> Actor {
    let user = s
        .accounts
        .register(None, UserFixtures::customer(handle))
        .await
        .unwrap();
    if role == UserRole::Customer {
        return user.actor();
    }
    let admin = Actor::new(UserId::new(), UserRole::Admin);
    s.accounts
        .assign_role(&admin, user.id, role)
        .await
        .unwrap()
        .actor()
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_health_check_reports_healthy() {
    let db = TestDatabase::new().await.unwrap();
    let store = PostgresInsuranceStore::new(db.pool().clone());

    assert!(store.health_check().await.is_healthy());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_claim_lifecycle_round_trips_through_postgres() {
    let db = TestDatabase::new().await.unwrap();
    let s = services(&db);

    let admin = s
        .accounts
        .ensure_admin(&Default::default())
        .await
        .unwrap()
        .unwrap()
        .actor();
    let customer = register(&s, "carol", UserRole::Customer).await;
    let agent = register(&s, "aaron", UserRole::Agent).await;

    let plan = s.catalog.create_plan(&admin, PlanFixtures::standard()).await.unwrap();
    let policy = s
        .manager
        .issue_policy(
            &customer,
            IssuePolicy {
                plan_id: plan.id,
                start_date: DateFixtures::policy_start(),
                payment_frequency: PaymentFrequency::Monthly,
                beneficiaries: vec![],
            },
        )
        .await
        .unwrap();
    assert_eq!(policy.end_date, DateFixtures::policy_end());
    assert!(policy.policy_number.starts_with("POL"));

    let policy = s.manager.activate_policy(&admin, policy.id).await.unwrap();
    assert_eq!(policy.status, PolicyStatus::Active);

    let claim = s
        .manager
        .submit_claim(&customer, ClaimFixtures::office_visit(policy.id, dec!(500)))
        .await
        .unwrap();
    let claim = s
        .manager
        .review_claim(&agent, claim.id, ClaimFixtures::approve(None))
        .await
        .unwrap();

    let stored = s.queries.get_claim(&customer, claim.id).await.unwrap();
    assert_eq!(stored.status, ClaimStatus::Approved);
    let split = stored.entitlement.expect("approved claim carries a split");
    assert_eq!(split.patient_share.amount(), dec!(100));
    assert_eq!(split.insurer_share.amount(), dec!(400));
    assert_split_balances(&split);

    s.manager
        .record_payment(&customer, PaymentFixtures::card(policy.id, dec!(200)))
        .await
        .unwrap();
    let payments = s.queries.list_payments(&customer, Page::default()).await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].amount.amount(), dec!(200));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_duplicate_username_is_a_conflict() {
    let db = TestDatabase::new().await.unwrap();
    let s = services(&db);

    s.accounts
        .register(None, UserFixtures::customer("dora"))
        .await
        .unwrap();
    let mut again = UserFixtures::customer("dora");
    again.email = "someone-else@example.com".to_string();

    assert_error_kind(s.accounts.register(None, again).await, ErrorKind::Conflict);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_dropped_transaction_rolls_back() {
    let db = TestDatabase::new().await.unwrap();
    let s = services(&db);
    let admin = s
        .accounts
        .ensure_admin(&Default::default())
        .await
        .unwrap()
        .unwrap()
        .actor();
    let plan = s.catalog.create_plan(&admin, PlanFixtures::standard()).await.unwrap();

    {
        let mut tx = s.store.begin().await.unwrap();
        let mut retired = tx.find_plan(plan.id).await.unwrap().unwrap();
        retired.deactivate();
        tx.update_plan(&retired).await.unwrap();
        // dropped without commit
    }

    let mut tx = s.store.begin().await.unwrap();
    assert!(tx.find_plan(plan.id).await.unwrap().unwrap().is_active);
    let claims = tx.list_claims(&ClaimFilter::default()).await.unwrap();
    assert!(claims.is_empty());
    assert!(tx.find_policy(Default::default(), Lock::ForUpdate).await.unwrap().is_none());
}
