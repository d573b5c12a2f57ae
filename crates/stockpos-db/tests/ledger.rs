//! Integration tests for the stock ledger, sale engine and account ledger.

use stockpos_core::{AccountKind, CoreError, Money, MovementKind, MAX_SALE_ITEMS};
use stockpos_db::{CheckoutItem, Database, DbConfig, DbError};
use uuid::Uuid;

async fn db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

/// File-backed database for tests that exercise concurrent tasks.
/// Pool size 2: both checkouts hold a connection at once, so they genuinely
/// collide on the write lock instead of serializing at pool acquisition.
async fn file_db() -> (Database, std::path::PathBuf) {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("ledger_{}.db", Uuid::new_v4()));
    let db = Database::new(DbConfig::new(&path).max_connections(2))
        .await
        .unwrap();

    (db, path)
}

async fn seed_product(db: &Database, name: &str, sku: &str, price_cents: i64, stock: i64) -> String {
    db.products()
        .insert(name, sku, price_cents, stock, None)
        .await
        .unwrap()
        .id
}

async fn seed_client(db: &Database, name: &str) -> String {
    db.clients()
        .insert(name, None, None, None)
        .await
        .unwrap()
        .id
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn duplicate_sku_is_rejected_and_catalog_unchanged() {
    let db = db().await;

    seed_product(&db, "Coca-Cola 330ml", "COKE-330", 150, 10).await;

    let err = db
        .products()
        .insert("Coca-Cola 500ml", "COKE-330", 250, 5, None)
        .await
        .unwrap_err();

    assert!(matches!(err, DbError::UniqueViolation { .. }));
    assert_eq!(db.products().count().await.unwrap(), 1);
}

#[tokio::test]
async fn product_validation_rejects_bad_input() {
    let db = db().await;

    assert!(db.products().insert("", "SKU-1", 100, 0, None).await.is_err());
    assert!(db.products().insert("Name", "", 100, 0, None).await.is_err());
    assert!(db
        .products()
        .insert("Name", "SKU-1", -1, 0, None)
        .await
        .is_err());
    assert!(db
        .products()
        .insert("Name", "SKU-1", 100, -1, None)
        .await
        .is_err());
    // Astronomical prices are rejected before they can overflow a line
    // total at checkout.
    assert!(db
        .products()
        .insert("Name", "SKU-1", i64::MAX, 0, None)
        .await
        .is_err());

    assert_eq!(db.products().count().await.unwrap(), 0);
}

#[tokio::test]
async fn delete_missing_product_is_not_found() {
    let db = db().await;

    let err = db.products().delete("no-such-id").await.unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));
}

#[tokio::test]
async fn category_delete_detaches_products() {
    let db = db().await;

    let category = db.categories().insert("Bebidas").await.unwrap();
    let product_id = db
        .products()
        .insert("Coca-Cola", "COKE-330", 150, 5, Some(&category.id))
        .await
        .unwrap()
        .id;

    db.categories().delete(&category.id).await.unwrap();

    let product = db.products().get_by_id(&product_id).await.unwrap().unwrap();
    assert_eq!(product.category_id, None);
}

// =============================================================================
// Stock Ledger
// =============================================================================

#[tokio::test]
async fn entry_and_exit_adjust_stock_and_append_movements() {
    let db = db().await;
    let product_id = seed_product(&db, "Coca-Cola", "COKE-330", 150, 5).await;

    db.stock()
        .record(&product_id, 7, MovementKind::Entry)
        .await
        .unwrap();
    db.stock()
        .record(&product_id, 4, MovementKind::Exit)
        .await
        .unwrap();

    let product = db.products().get_by_id(&product_id).await.unwrap().unwrap();
    assert_eq!(product.stock, 8); // 5 + 7 - 4

    let movements = db.stock().list().await.unwrap();
    assert_eq!(movements.len(), 2);
    // Newest first.
    assert_eq!(movements[0].kind, MovementKind::Exit);
    assert_eq!(movements[1].kind, MovementKind::Entry);
    assert_eq!(movements[0].product_name.as_deref(), Some("Coca-Cola"));
}

#[tokio::test]
async fn over_exit_fails_and_leaves_no_trace() {
    let db = db().await;
    let product_id = seed_product(&db, "Coca-Cola", "COKE-330", 150, 3).await;

    let err = db
        .stock()
        .record(&product_id, 5, MovementKind::Exit)
        .await
        .unwrap_err();

    match err {
        DbError::Domain(CoreError::InsufficientStock {
            sku,
            available,
            requested,
        }) => {
            assert_eq!(sku, "COKE-330");
            assert_eq!(available, 3);
            assert_eq!(requested, 5);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    // Atomicity: stock untouched, no movement row.
    let product = db.products().get_by_id(&product_id).await.unwrap().unwrap();
    assert_eq!(product.stock, 3);
    assert!(db.stock().list().await.unwrap().is_empty());
}

#[tokio::test]
async fn non_positive_quantity_is_rejected() {
    let db = db().await;
    let product_id = seed_product(&db, "Coca-Cola", "COKE-330", 150, 3).await;

    for quantity in [0, -4] {
        let err = db
            .stock()
            .record(&product_id, quantity, MovementKind::Entry)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::Validation(_))
        ));
    }
}

#[tokio::test]
async fn movement_for_unknown_product_is_not_found() {
    let db = db().await;

    let err = db
        .stock()
        .record("no-such-id", 1, MovementKind::Entry)
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));
}

#[tokio::test]
async fn deleted_product_shows_absent_marker_in_movement_list() {
    let db = db().await;
    let product_id = seed_product(&db, "Coca-Cola", "COKE-330", 150, 5).await;

    db.stock()
        .record(&product_id, 2, MovementKind::Entry)
        .await
        .unwrap();
    db.products().delete(&product_id).await.unwrap();

    let movements = db.stock().list().await.unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].product_id, product_id);
    assert_eq!(movements[0].product_name, None);
}

// =============================================================================
// Sale Engine
// =============================================================================

#[tokio::test]
async fn checkout_commits_sale_stock_exits_and_debit() {
    let db = db().await;
    // Worked example: A stock=5 price=$10.00, B stock=2 price=$20.00.
    let a = seed_product(&db, "Product A", "SKU-A", 1000, 5).await;
    let b = seed_product(&db, "Product B", "SKU-B", 2000, 2).await;
    let client_id = seed_client(&db, "Ana").await;

    let (sale, items) = db
        .sales()
        .checkout(
            &client_id,
            &[
                CheckoutItem {
                    product_id: a.clone(),
                    quantity: 2,
                },
                CheckoutItem {
                    product_id: b.clone(),
                    quantity: 1,
                },
            ],
        )
        .await
        .unwrap();

    assert_eq!(sale.total_cents, 4000);
    assert_eq!(sale.total(), Money::from_cents(4000));
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name_snapshot, "Product A");
    assert_eq!(items[0].line_total_cents, 2000);

    // Stock deducted in full.
    assert_eq!(db.products().get_by_id(&a).await.unwrap().unwrap().stock, 3);
    assert_eq!(db.products().get_by_id(&b).await.unwrap().unwrap().stock, 1);

    // One SALIDA movement per item, carrying sale and client context.
    let movements = db.stock().list().await.unwrap();
    assert_eq!(movements.len(), 2);
    for m in &movements {
        assert_eq!(m.kind, MovementKind::Exit);
        assert_eq!(m.sale_id.as_deref(), Some(sale.id.as_str()));
        assert_eq!(m.client_id.as_deref(), Some(client_id.as_str()));
    }

    // Exactly one COMPRA debit for the total.
    let history = db.accounts().history(&client_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind, AccountKind::Purchase);
    assert_eq!(history[0].amount_cents, 4000);
    assert_eq!(history[0].sale_id.as_deref(), Some(sale.id.as_str()));

    assert_eq!(db.accounts().balance(&client_id).await.unwrap().cents(), 4000);
}

#[tokio::test]
async fn checkout_captures_price_at_sale_time() {
    let db = db().await;
    let a = seed_product(&db, "Product A", "SKU-A", 1000, 10).await;
    let client_id = seed_client(&db, "Ana").await;

    let (sale, items) = db
        .sales()
        .checkout(
            &client_id,
            &[CheckoutItem {
                product_id: a.clone(),
                quantity: 1,
            }],
        )
        .await
        .unwrap();

    // Later catalog changes must not rewrite the committed sale.
    db.products().delete(&a).await.unwrap();

    let persisted = db.sales().get_items(&sale.id).await.unwrap();
    assert_eq!(persisted.len(), items.len());
    assert_eq!(persisted[0].unit_price_cents, 1000);
    assert_eq!(persisted[0].name_snapshot, "Product A");
}

#[tokio::test]
async fn checkout_with_insufficient_stock_changes_nothing() {
    let db = db().await;
    let a = seed_product(&db, "Product A", "SKU-A", 1000, 5).await;
    let b = seed_product(&db, "Product B", "SKU-B", 2000, 2).await;
    let client_id = seed_client(&db, "Ana").await;

    // Second item over-requests: the WHOLE checkout must fail.
    let err = db
        .sales()
        .checkout(
            &client_id,
            &[
                CheckoutItem {
                    product_id: a.clone(),
                    quantity: 2,
                },
                CheckoutItem {
                    product_id: b.clone(),
                    quantity: 10,
                },
            ],
        )
        .await
        .unwrap_err();

    match err {
        DbError::Domain(CoreError::InsufficientStock { sku, .. }) => assert_eq!(sku, "SKU-B"),
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    // State before == state after: stock, movements, sales, account.
    assert_eq!(db.products().get_by_id(&a).await.unwrap().unwrap().stock, 5);
    assert_eq!(db.products().get_by_id(&b).await.unwrap().unwrap().stock, 2);
    assert!(db.stock().list().await.unwrap().is_empty());
    assert!(db.accounts().history(&client_id).await.unwrap().is_empty());

    let sale_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(sale_count, 0);
}

#[tokio::test]
async fn oversized_carts_are_rejected() {
    let db = db().await;
    let a = seed_product(&db, "Product A", "SKU-A", 1000, 500).await;
    let client_id = seed_client(&db, "Ana").await;

    let items: Vec<CheckoutItem> = (0..MAX_SALE_ITEMS + 1)
        .map(|_| CheckoutItem {
            product_id: a.clone(),
            quantity: 1,
        })
        .collect();

    let err = db.sales().checkout(&client_id, &items).await.unwrap_err();
    assert!(matches!(
        err,
        DbError::Domain(CoreError::SaleTooLarge { .. })
    ));

    assert_eq!(db.products().get_by_id(&a).await.unwrap().unwrap().stock, 500);
}

#[tokio::test]
async fn checkout_rejects_empty_cart_and_bad_quantities() {
    let db = db().await;
    let a = seed_product(&db, "Product A", "SKU-A", 1000, 5).await;
    let client_id = seed_client(&db, "Ana").await;

    let err = db.sales().checkout(&client_id, &[]).await.unwrap_err();
    assert!(matches!(err, DbError::Domain(CoreError::EmptySale)));

    let err = db
        .sales()
        .checkout(
            &client_id,
            &[CheckoutItem {
                product_id: a.clone(),
                quantity: 0,
            }],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));

    assert_eq!(db.products().get_by_id(&a).await.unwrap().unwrap().stock, 5);
}

#[tokio::test]
async fn checkout_for_unknown_client_or_product_is_not_found() {
    let db = db().await;
    let a = seed_product(&db, "Product A", "SKU-A", 1000, 5).await;
    let client_id = seed_client(&db, "Ana").await;

    let err = db
        .sales()
        .checkout(
            "no-such-client",
            &[CheckoutItem {
                product_id: a.clone(),
                quantity: 1,
            }],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));

    let err = db
        .sales()
        .checkout(
            &client_id,
            &[CheckoutItem {
                product_id: "no-such-product".into(),
                quantity: 1,
            }],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));

    assert_eq!(db.products().get_by_id(&a).await.unwrap().unwrap().stock, 5);
}

#[tokio::test]
async fn concurrent_checkouts_cannot_jointly_overdraw() {
    let (db, path) = file_db().await;
    let client_id = seed_client(&db, "Ana").await;

    // Combined request (3 + 3) exceeds stock (5): exactly one may succeed,
    // and the loser must see a clean insufficient-stock error, never a lock
    // error. Repeated so both interleavings get a chance to occur.
    for round in 0..10 {
        let a = seed_product(&db, "Product A", &format!("SKU-A{round}"), 1000, 5).await;

        let mut handles = Vec::new();
        for _ in 0..2 {
            let db = db.clone();
            let a = a.clone();
            let client_id = client_id.clone();
            handles.push(tokio::spawn(async move {
                db.sales()
                    .checkout(
                        &client_id,
                        &[CheckoutItem {
                            product_id: a,
                            quantity: 3,
                        }],
                    )
                    .await
            }));
        }

        let mut ok = 0;
        let mut insufficient = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => ok += 1,
                Err(DbError::Domain(CoreError::InsufficientStock { .. })) => insufficient += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(ok, 1);
        assert_eq!(insufficient, 1);

        let product = db.products().get_by_id(&a).await.unwrap().unwrap();
        assert_eq!(product.stock, 2);
    }

    db.close().await;
    let _ = std::fs::remove_file(&path);
}

// =============================================================================
// Client Account Ledger
// =============================================================================

#[tokio::test]
async fn balance_of_empty_history_is_zero() {
    let db = db().await;
    let client_id = seed_client(&db, "Ana").await;

    assert!(db.accounts().history(&client_id).await.unwrap().is_empty());
    assert_eq!(db.accounts().balance(&client_id).await.unwrap().cents(), 0);
}

#[tokio::test]
async fn balance_is_purchases_minus_payments() {
    let db = db().await;
    let a = seed_product(&db, "Product A", "SKU-A", 1000, 10).await;
    let client_id = seed_client(&db, "Ana").await;

    db.sales()
        .checkout(
            &client_id,
            &[CheckoutItem {
                product_id: a,
                quantity: 4,
            }],
        )
        .await
        .unwrap();

    db.accounts()
        .record_payment(&client_id, 1500, "efectivo", Some("Pago parcial"))
        .await
        .unwrap();

    // 4000 - 1500
    assert_eq!(db.accounts().balance(&client_id).await.unwrap().cents(), 2500);

    // History is chronological, oldest first.
    let history = db.accounts().history(&client_id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].kind, AccountKind::Purchase);
    assert_eq!(history[1].kind, AccountKind::Payment);
    assert_eq!(history[1].payment_method.as_deref(), Some("efectivo"));
}

#[tokio::test]
async fn identical_payments_are_not_deduplicated() {
    let db = db().await;
    let client_id = seed_client(&db, "Ana").await;

    for _ in 0..2 {
        db.accounts()
            .record_payment(&client_id, 2000, "efectivo", None)
            .await
            .unwrap();
    }

    let history = db.accounts().history(&client_id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(db.accounts().balance(&client_id).await.unwrap().cents(), -4000);
}

#[tokio::test]
async fn payment_validation_and_unknown_client() {
    let db = db().await;
    let client_id = seed_client(&db, "Ana").await;

    for amount in [0, -100, i64::MAX] {
        let err = db
            .accounts()
            .record_payment(&client_id, amount, "efectivo", None)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));
    }

    let err = db
        .accounts()
        .record_payment("no-such-client", 100, "efectivo", None)
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));
}
