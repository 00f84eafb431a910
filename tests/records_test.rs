mod common;

use anyhow::Result;
use common::{earn, parse_date, spend, test_service};
use foxtally::TransactionType;
use foxtally::analytics::TransactionFilter;
use foxtally::application::{AppError, NewTransaction, TransactionUpdate};

#[tokio::test]
async fn test_record_and_get_transaction() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let tx = service
        .record_transaction(NewTransaction {
            kind: TransactionType::Expense,
            amount: 4550,
            category: "  Dining ".to_string(),
            description: Some("Lunch".to_string()),
            date: parse_date("2025-03-14"),
        })
        .await?;

    assert!(!tx.id.is_empty());
    assert_eq!(tx.category, "Dining");
    assert_eq!(tx.date, "2025-03-14");

    let fetched = service.get_transaction(&tx.id).await?;
    assert_eq!(fetched, tx);
    assert_eq!(fetched.description.as_deref(), Some("Lunch"));

    Ok(())
}

#[tokio::test]
async fn test_record_rejects_invalid_input() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let zero = spend(&service, 0, "Dining", "2025-03-14").await;
    assert!(matches!(
        zero.unwrap_err().downcast_ref::<AppError>(),
        Some(AppError::InvalidAmount(_))
    ));

    let blank = spend(&service, 100, "   ", "2025-03-14").await;
    assert!(matches!(
        blank.unwrap_err().downcast_ref::<AppError>(),
        Some(AppError::EmptyCategory)
    ));

    assert!(service.all_transactions().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_unknown_id_is_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;
    spend(&service, 100, "Dining", "2025-03-14").await?;

    assert!(matches!(
        service.get_transaction("missing").await,
        Err(AppError::TransactionNotFound(id)) if id == "missing"
    ));
    assert!(matches!(
        service.delete_transaction("missing").await,
        Err(AppError::TransactionNotFound(_))
    ));
    assert!(matches!(
        service
            .update_transaction("missing", TransactionUpdate::default())
            .await,
        Err(AppError::TransactionNotFound(_))
    ));
    assert_eq!(service.all_transactions().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_update_transaction() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let tx = spend(&service, 1000, "Dining", "2025-03-14").await?;

    let updated = service
        .update_transaction(
            &tx.id,
            TransactionUpdate {
                kind: Some(TransactionType::Income),
                amount: Some(2500),
                category: Some("Bonus".to_string()),
                description: Some("Refund".to_string()),
                date: Some(parse_date("2025-03-01")),
            },
        )
        .await?;

    assert_eq!(updated.id, tx.id);
    assert_eq!(updated.kind, TransactionType::Income);
    assert_eq!(updated.amount, 2500);
    assert_eq!(updated.category, "Bonus");
    assert_eq!(updated.date, "2025-03-01");
    assert_eq!(service.get_transaction(&tx.id).await?, updated);

    // An empty description clears it
    let cleared = service
        .update_transaction(
            &tx.id,
            TransactionUpdate {
                description: Some(String::new()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(cleared.description, None);
    assert_eq!(cleared.amount, 2500);

    // Invalid changes leave the stored record alone
    let rejected = service
        .update_transaction(
            &tx.id,
            TransactionUpdate {
                amount: Some(-5),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(rejected, Err(AppError::InvalidAmount(_))));
    assert_eq!(service.get_transaction(&tx.id).await?.amount, 2500);

    Ok(())
}

#[tokio::test]
async fn test_delete_transaction() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let keep = spend(&service, 1000, "Dining", "2025-03-14").await?;
    let gone = spend(&service, 2000, "Transport", "2025-03-14").await?;

    let removed = service.delete_transaction(&gone.id).await?;
    assert_eq!(removed.id, gone.id);

    let remaining = service.all_transactions().await?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, keep.id);

    Ok(())
}

#[tokio::test]
async fn test_list_transactions_with_filter() -> Result<()> {
    let (service, _temp) = test_service().await?;
    spend(&service, 1000, "Dining", "2025-03-01").await?;
    spend(&service, 2000, "Dining", "2025-03-10").await?;
    spend(&service, 3000, "Transport", "2025-03-10").await?;
    earn(&service, 500000, "Salary", "2025-03-05").await?;

    let all = service.list_transactions(&TransactionFilter::default()).await?;
    assert_eq!(all.transactions.len(), 4);
    assert_eq!(all.transactions[0].date, "2025-03-10");
    assert_eq!(all.transactions[3].date, "2025-03-01");
    assert_eq!(all.totals.income, 500000);
    assert_eq!(all.totals.expense, 6000);

    let dining = service
        .list_transactions(&TransactionFilter::default().with_category("Dining"))
        .await?;
    assert_eq!(dining.transactions.len(), 2);
    assert_eq!(dining.totals.expense, 3000);

    let same_day_expenses = service
        .list_transactions(
            &TransactionFilter::default()
                .with_kind(TransactionType::Expense)
                .with_date(parse_date("2025-03-10")),
        )
        .await?;
    assert_eq!(same_day_expenses.transactions.len(), 2);
    assert_eq!(same_day_expenses.totals.expense, 5000);
    assert_eq!(same_day_expenses.totals.income, 0);

    let income = service
        .list_transactions(&TransactionFilter::default().with_kind(TransactionType::Income))
        .await?;
    assert_eq!(income.transactions.len(), 1);
    assert_eq!(income.totals.net(), 500000);

    Ok(())
}

#[tokio::test]
async fn test_balance_and_day_summary() -> Result<()> {
    let (service, _temp) = test_service().await?;
    assert_eq!(service.balance().await?, 0);

    earn(&service, 300000, "Salary", "2025-03-01").await?;
    spend(&service, 4500, "Dining", "2025-03-14").await?;
    spend(&service, 1500, "Transport", "2025-03-14").await?;
    spend(&service, 9900, "Shopping", "2025-03-15").await?;

    assert_eq!(service.balance().await?, 300000 - 4500 - 1500 - 9900);

    let summary = service.day_summary(parse_date("2025-03-14")).await?;
    assert_eq!(summary.transactions.len(), 2);
    assert_eq!(summary.totals.expense, 6000);
    assert_eq!(summary.totals.income, 0);

    let quiet = service.day_summary(parse_date("2025-03-20")).await?;
    assert!(quiet.transactions.is_empty());
    assert_eq!(quiet.totals.net(), 0);

    Ok(())
}

#[tokio::test]
async fn test_records_survive_reconnect() -> Result<()> {
    let (service, temp) = test_service().await?;
    let tx = spend(&service, 1234, "Medical", "2025-02-02").await?;
    drop(service);

    let db_path = temp.path().join("test.db");
    let reopened =
        foxtally::application::TrackerService::connect(db_path.to_str().unwrap()).await?;
    assert_eq!(reopened.get_transaction(&tx.id).await?, tx);

    Ok(())
}
