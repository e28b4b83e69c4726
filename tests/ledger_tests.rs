//! Ledger integration tests
//!
//! These run against a Postgres database provisioned through `DATABASE_URL`
//! (each test gets its own schema via the embedded migrator).

use sqlx::PgPool;

use biblion_core::{
    config::CirculationConfig,
    error::AppError,
    models::{CreateItem, CreateLoan, CreateMember, Item, Member},
    repository::Repository,
    services::Services,
};

fn services(pool: PgPool) -> Services {
    Services::new(Repository::new(pool), CirculationConfig::default())
}

async fn add_item(services: &Services, title: &str, creator: &str) -> Item {
    services
        .catalog
        .create_item(CreateItem {
            title: title.to_string(),
            creator: creator.to_string(),
        })
        .await
        .expect("Failed to create item")
}

async fn add_member(services: &Services, name: &str) -> Member {
    services
        .directory
        .create_member(CreateMember {
            name: name.to_string(),
            contact: format!("{}@example.org", name.to_lowercase()),
        })
        .await
        .expect("Failed to create member")
}

/// Availability must agree with the existence of an open loan at every
/// observable point.
async fn assert_availability_consistent(services: &Services, item_id: i32) {
    let item = services.catalog.get_item(item_id).await.unwrap();
    let open_for_item = services
        .views
        .active_loans()
        .await
        .unwrap()
        .into_iter()
        .filter(|l| l.item_title == item.title)
        .count();
    assert_eq!(
        item.available,
        open_for_item == 0,
        "availability flag disagrees with open loans for item {}",
        item_id
    );
}

#[sqlx::test(migrator = "biblion_core::repository::MIGRATOR")]
#[ignore] // Run with: cargo test -- --ignored
async fn borrow_and_return_cycle(pool: PgPool) {
    let services = services(pool);

    let item = add_item(&services, "The Hobbit", "J.R.R. Tolkien").await;
    let member = add_member(&services, "Alice").await;
    assert!(item.available);

    // Borrow: loan opens, availability drops
    let loan = services
        .ledger
        .borrow(CreateLoan {
            item_id: item.id,
            member_id: member.id,
        })
        .await
        .expect("Borrow failed");
    assert!(loan.is_open());
    assert!(!services.catalog.get_item(item.id).await.unwrap().available);
    assert_availability_consistent(&services, item.id).await;

    let active = services.views.active_loans().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].item_title, "The Hobbit");
    assert_eq!(active[0].member_name, "Alice");

    // Borrowing the same item again must fail cleanly
    let second = services
        .ledger
        .borrow(CreateLoan {
            item_id: item.id,
            member_id: member.id,
        })
        .await;
    assert!(matches!(second, Err(AppError::ItemUnavailable(_))));
    assert_availability_consistent(&services, item.id).await;

    // Return: loan closes, availability restored
    let returned = services.ledger.return_loan(loan.id).await.expect("Return failed");
    assert!(returned.returned_at.is_some());
    assert!(returned.borrowed_at <= returned.returned_at.unwrap());
    assert!(services.catalog.get_item(item.id).await.unwrap().available);
    assert_availability_consistent(&services, item.id).await;

    assert!(services.views.active_loans().await.unwrap().is_empty());

    let history = services.views.loan_history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].returned_at.is_some());
}

#[sqlx::test(migrator = "biblion_core::repository::MIGRATOR")]
#[ignore]
async fn concurrent_borrows_yield_one_loan(pool: PgPool) {
    let services = services(pool);

    let item = add_item(&services, "Dune", "Frank Herbert").await;
    let alice = add_member(&services, "Alice").await;
    let bob = add_member(&services, "Bob").await;

    let (first, second) = tokio::join!(
        services.ledger.borrow(CreateLoan {
            item_id: item.id,
            member_id: alice.id,
        }),
        services.ledger.borrow(CreateLoan {
            item_id: item.id,
            member_id: bob.id,
        }),
    );

    let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one concurrent borrow may succeed");

    let failure = if first.is_err() { first } else { second };
    assert!(matches!(failure, Err(AppError::ItemUnavailable(_))));

    assert_eq!(services.views.active_loans().await.unwrap().len(), 1);
    assert_availability_consistent(&services, item.id).await;
}

#[sqlx::test(migrator = "biblion_core::repository::MIGRATOR")]
#[ignore]
async fn return_is_not_idempotent(pool: PgPool) {
    let services = services(pool);

    let item = add_item(&services, "The Hobbit", "J.R.R. Tolkien").await;
    let member = add_member(&services, "Alice").await;

    let loan = services
        .ledger
        .borrow(CreateLoan {
            item_id: item.id,
            member_id: member.id,
        })
        .await
        .unwrap();

    let returned = services.ledger.return_loan(loan.id).await.unwrap();
    let second = services.ledger.return_loan(loan.id).await;
    assert!(matches!(second, Err(AppError::AlreadyReturned(_))));

    // The recorded return time is untouched by the rejected second call
    let reloaded = services.ledger.get_loan(loan.id).await.unwrap();
    assert_eq!(reloaded.returned_at, returned.returned_at);
    assert!(services.catalog.get_item(item.id).await.unwrap().available);
}

#[sqlx::test(migrator = "biblion_core::repository::MIGRATOR")]
#[ignore]
async fn borrow_rejects_unknown_references(pool: PgPool) {
    let services = services(pool);

    let item = add_item(&services, "The Hobbit", "J.R.R. Tolkien").await;
    let member = add_member(&services, "Alice").await;

    let unknown_item = services
        .ledger
        .borrow(CreateLoan {
            item_id: item.id + 999,
            member_id: member.id,
        })
        .await;
    assert!(matches!(unknown_item, Err(AppError::NotFound(_))));

    let unknown_member = services
        .ledger
        .borrow(CreateLoan {
            item_id: item.id,
            member_id: member.id + 999,
        })
        .await;
    assert!(matches!(unknown_member, Err(AppError::NotFound(_))));

    // Neither failure created a loan, and the item is still available
    assert!(services.views.loan_history().await.unwrap().is_empty());
    assert!(services.catalog.get_item(item.id).await.unwrap().available);

    let unknown_loan = services.ledger.return_loan(12345).await;
    assert!(matches!(unknown_loan, Err(AppError::NotFound(_))));
}

#[sqlx::test(migrator = "biblion_core::repository::MIGRATOR")]
#[ignore]
async fn member_views_and_open_loan_count(pool: PgPool) {
    let services = services(pool);

    let hobbit = add_item(&services, "The Hobbit", "J.R.R. Tolkien").await;
    let dune = add_item(&services, "Dune", "Frank Herbert").await;
    let alice = add_member(&services, "Alice").await;
    let bob = add_member(&services, "Bob").await;

    let members = services.directory.list_members().await.unwrap();
    assert_eq!(
        members.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
        vec!["Alice", "Bob"]
    );
    assert_eq!(
        services.directory.get_member(alice.id).await.unwrap().name,
        "Alice"
    );

    for item_id in [hobbit.id, dune.id] {
        services
            .ledger
            .borrow(CreateLoan {
                item_id,
                member_id: alice.id,
            })
            .await
            .unwrap();
    }

    let alice_loans = services.views.member_loans(alice.id).await.unwrap();
    assert_eq!(alice_loans.len(), 2);
    assert!(alice_loans.iter().any(|l| l.item_title == "Dune" && l.creator == "Frank Herbert"));

    assert_eq!(services.views.open_loan_count(alice.id).await.unwrap(), 2);
    assert_eq!(services.views.open_loan_count(bob.id).await.unwrap(), 0);
    assert!(services.views.member_loans(bob.id).await.unwrap().is_empty());

    let unknown = services.views.member_loans(999).await;
    assert!(matches!(unknown, Err(AppError::NotFound(_))));
    let unknown_count = services.views.open_loan_count(999).await;
    assert!(matches!(unknown_count, Err(AppError::NotFound(_))));
}

#[sqlx::test(migrator = "biblion_core::repository::MIGRATOR")]
#[ignore]
async fn overdue_loans_classified_by_due_date(pool: PgPool) {
    let repository = Repository::new(pool);
    // A negative loan period makes every new loan immediately overdue
    let overdue_services = Services::new(
        repository.clone(),
        CirculationConfig {
            loan_period_days: -1,
        },
    );
    let services = Services::new(repository, CirculationConfig::default());

    let hobbit = add_item(&services, "The Hobbit", "J.R.R. Tolkien").await;
    let dune = add_item(&services, "Dune", "Frank Herbert").await;
    let alice = add_member(&services, "Alice").await;

    overdue_services
        .ledger
        .borrow(CreateLoan {
            item_id: hobbit.id,
            member_id: alice.id,
        })
        .await
        .unwrap();
    services
        .ledger
        .borrow(CreateLoan {
            item_id: dune.id,
            member_id: alice.id,
        })
        .await
        .unwrap();

    let overdue = services.views.overdue_loans().await.unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].item_title, "The Hobbit");
    assert_eq!(services.views.active_loans().await.unwrap().len(), 2);
}

#[sqlx::test(migrator = "biblion_core::repository::MIGRATOR")]
#[ignore]
async fn search_is_case_insensitive(pool: PgPool) {
    let services = services(pool);

    add_item(
        &services,
        "Harry Potter and the Philosopher's Stone",
        "J.K. Rowling",
    )
    .await;
    add_item(&services, "The Hobbit", "J.R.R. Tolkien").await;

    for term in ["Potter", "potter", "POTTER"] {
        let found = services.catalog.search_items(term).await.unwrap();
        assert_eq!(found.len(), 1, "search for {:?}", term);
        assert_eq!(found[0].title, "Harry Potter and the Philosopher's Stone");
    }

    // Creator names match too
    let by_creator = services.catalog.search_items("tolkien").await.unwrap();
    assert_eq!(by_creator.len(), 1);
    assert_eq!(by_creator[0].title, "The Hobbit");
}

#[sqlx::test(migrator = "biblion_core::repository::MIGRATOR")]
#[ignore]
async fn catalog_listing_and_validation(pool: PgPool) {
    let services = services(pool);

    let hobbit = add_item(&services, "The Hobbit", "J.R.R. Tolkien").await;
    add_item(&services, "Dune", "Frank Herbert").await;
    let alice = add_member(&services, "Alice").await;

    // Stable title order
    let all = services.catalog.list_items().await.unwrap();
    assert_eq!(
        all.iter().map(|i| i.title.as_str()).collect::<Vec<_>>(),
        vec!["Dune", "The Hobbit"]
    );

    services
        .ledger
        .borrow(CreateLoan {
            item_id: hobbit.id,
            member_id: alice.id,
        })
        .await
        .unwrap();

    let available = services.catalog.list_available().await.unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].title, "Dune");

    let bad_item = services
        .catalog
        .create_item(CreateItem {
            title: String::new(),
            creator: "Nobody".to_string(),
        })
        .await;
    assert!(matches!(bad_item, Err(AppError::Validation(_))));

    let bad_member = services
        .directory
        .create_member(CreateMember {
            name: String::new(),
            contact: String::new(),
        })
        .await;
    assert!(matches!(bad_member, Err(AppError::Validation(_))));
}
