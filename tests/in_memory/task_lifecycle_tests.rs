//! In-memory integration tests for the escrowed task lifecycle.

use super::helpers::{Marketplace, client, executor, logo_request, marketplace, wallet};
use async_trait::async_trait;
use mockall::mock;
use rstest::rstest;
use std::time::Duration;
use taskmarket::task::{
    adapters::memory::{EscrowBehaviour, InMemoryEscrowClient},
    domain::{
        DepositReceipt, Rating, RejectionKind, ReportRef, Role, TaskDomainError, TaskStatus,
    },
    ports::{DepositRequest, EscrowClient, EscrowError, EscrowResult, TaskRepository},
    services::TaskLifecycleError,
};

mock! {
    pub Escrow {}

    #[async_trait]
    impl EscrowClient for Escrow {
        async fn deposit(&self, request: &DepositRequest) -> EscrowResult<DepositReceipt>;
    }
}

fn escrow_issuing(receipt: &'static str) -> MockEscrow {
    let mut escrow = MockEscrow::new();
    escrow
        .expect_deposit()
        .returning(move |_| DepositReceipt::new(receipt).map_err(EscrowError::transport));
    escrow
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn escrowed_task_runs_from_posting_to_mutual_rating() -> eyre::Result<()> {
    let market = Marketplace::with_escrow(escrow_issuing("R1"))?;
    let c1 = client("C1")?;
    let e1 = executor("E1")?;

    // Posting
    let task = market.lifecycle.create(&c1, logo_request()?).await?;
    eyre::ensure!(task.status() == TaskStatus::Open, "new task should be open");
    eyre::ensure!(task.deposit_tx().as_str() == "R1", "receipt should be recorded");
    eyre::ensure!(task.responses().is_empty(), "no responses yet");
    eyre::ensure!(task.amount().to_string() == "5", "amount should be 5");

    // Responding
    let responded = market
        .lifecycle
        .respond(&e1, task.id(), "I can do this")
        .await?;
    let response = responded
        .responses()
        .first()
        .ok_or_else(|| eyre::eyre!("expected one response"))?;
    eyre::ensure!(response.wallet().as_str() == "E1", "responder wallet");
    eyre::ensure!(response.message() == "I can do this", "response message");
    let again = market.lifecycle.respond(&e1, task.id(), "again").await;
    eyre::ensure!(again.is_err(), "second response must be rejected");

    // Selecting
    let selected = market.lifecycle.select(&c1, task.id(), e1.wallet()).await?;
    eyre::ensure!(selected.status() == TaskStatus::InProgress, "in progress");
    eyre::ensure!(selected.executor() == Some(e1.wallet()), "executor set");
    let e1_as_client = client("E1")?;
    let by_executor = market
        .lifecycle
        .select(&e1_as_client, task.id(), e1.wallet())
        .await
        .err()
        .and_then(|err| err.rejection_kind());
    eyre::ensure!(
        by_executor == Some(RejectionKind::Authorization),
        "executor selecting must be an authorization error, got {by_executor:?}"
    );

    // Delivering
    let report = ReportRef::new("ipfs://logo-final")?;
    let submitted = market
        .lifecycle
        .submit_report(&e1, task.id(), report.clone())
        .await?;
    eyre::ensure!(submitted.status() == TaskStatus::Submitted, "submitted");
    eyre::ensure!(submitted.report_file() == Some(&report), "report recorded");
    let confirmed = market.lifecycle.confirm(&c1, task.id()).await?;
    eyre::ensure!(confirmed.status() == TaskStatus::Completed, "completed");
    eyre::ensure!(confirmed.completed(), "completed flag");

    // Rating
    market.lifecycle.rate(&c1, task.id(), Rating::new(4)?).await?;
    let rated = market.lifecycle.rate(&e1, task.id(), Rating::new(5)?).await?;
    eyre::ensure!(rated.client_rating() == Some(Rating::new(4)?), "creator's rating");
    eyre::ensure!(rated.executor_rating() == Some(Rating::new(5)?), "executor's rating");
    let second = market.lifecycle.rate(&c1, task.id(), Rating::new(1)?).await;
    eyre::ensure!(
        matches!(
            second,
            Err(TaskLifecycleError::Domain(TaskDomainError::AlreadyRated { .. }))
        ),
        "second rating by the creator must be rejected"
    );

    let executor_rating = market.ratings.rating_for(e1.wallet(), Role::Executor).await?;
    let client_rating = market.ratings.rating_for(c1.wallet(), Role::Client).await?;
    eyre::ensure!(executor_rating.to_string() == "4.0", "E1 received 4");
    eyre::ensure!(client_rating.to_string() == "5.0", "C1 received 5");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn only_the_creator_can_select(
    marketplace: eyre::Result<Marketplace<InMemoryEscrowClient>>,
) -> eyre::Result<()> {
    let market = marketplace?;
    let task = market.lifecycle.create(&client("C1")?, logo_request()?).await?;
    market
        .lifecycle
        .respond(&executor("E1")?, task.id(), "ready")
        .await?;

    for intruder in ["C2", "E1", "X9"] {
        let result = market
            .lifecycle
            .select(&client(intruder)?, task.id(), &wallet("E1")?)
            .await;
        let kind = result.err().and_then(|err| err.rejection_kind());
        eyre::ensure!(
            kind == Some(RejectionKind::Authorization),
            "{intruder} selecting should be unauthorized, got {kind:?}"
        );
    }

    let stored = market
        .lifecycle
        .find_by_id(task.id())
        .await?
        .ok_or_else(|| eyre::eyre!("task should exist"))?;
    eyre::ensure!(stored.status() == TaskStatus::Open, "status unchanged");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn executor_never_changes_after_selection(
    marketplace: eyre::Result<Marketplace<InMemoryEscrowClient>>,
) -> eyre::Result<()> {
    let market = marketplace?;
    let c1 = client("C1")?;
    let task = market.lifecycle.create(&c1, logo_request()?).await?;
    for name in ["E1", "E2"] {
        market
            .lifecycle
            .respond(&executor(name)?, task.id(), "available")
            .await?;
    }
    market.lifecycle.select(&c1, task.id(), &wallet("E1")?).await?;

    let reselect = market.lifecycle.select(&c1, task.id(), &wallet("E2")?).await;
    let kind = reselect.err().and_then(|err| err.rejection_kind());
    eyre::ensure!(
        kind == Some(RejectionKind::StateConflict),
        "second select should be a state conflict, got {kind:?}"
    );

    let stored = market
        .repository
        .find_by_id(task.id())
        .await?
        .ok_or_else(|| eyre::eyre!("task should exist"))?;
    eyre::ensure!(
        stored.executor().map(|wallet| wallet.as_str()) == Some("E1"),
        "executor must stay E1"
    );
    Ok(())
}

#[rstest]
#[case(EscrowBehaviour::Reject("wallet declined".to_owned()))]
#[case(EscrowBehaviour::Stall)]
#[tokio::test(flavor = "multi_thread")]
async fn failed_deposit_creates_no_task(#[case] behaviour: EscrowBehaviour) -> eyre::Result<()> {
    let market = Marketplace::with_escrow_and_timeout(
        InMemoryEscrowClient::with_behaviour(behaviour),
        Duration::from_millis(50),
    )?;

    let result = market
        .lifecycle
        .create(&client("C1")?, logo_request()?)
        .await;

    eyre::ensure!(
        matches!(result, Err(TaskLifecycleError::Escrow(_))),
        "expected an escrow failure, got {result:?}"
    );
    eyre::ensure!(
        market.repository.list_all().await?.is_empty(),
        "store must stay empty"
    );
    eyre::ensure!(market.escrow.deposits().is_empty(), "nothing deposited");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn chat_is_private_to_participants(
    marketplace: eyre::Result<Marketplace<InMemoryEscrowClient>>,
) -> eyre::Result<()> {
    let market = marketplace?;
    let c1 = client("C1")?;
    let e1 = executor("E1")?;
    let task = market.lifecycle.create(&c1, logo_request()?).await?;
    market.lifecycle.respond(&e1, task.id(), "hello").await?;
    market.lifecycle.select(&c1, task.id(), e1.wallet()).await?;

    market.chat.post_message(&c1, task.id(), "Any colour preferences?").await?;
    market.chat.post_message(&e1, task.id(), "Earth tones").await?;
    let outsider = market
        .chat
        .post_message(&executor("E2")?, task.id(), "hi all")
        .await;
    eyre::ensure!(outsider.is_err(), "non-participant must be rejected");

    let log = market.chat.read_messages(&e1, task.id()).await?;
    let texts: Vec<&str> = log.iter().map(|message| message.message()).collect();
    eyre::ensure!(
        texts == ["Any colour preferences?", "Earth tones"],
        "unexpected chat log {texts:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn boards_follow_the_lifecycle(
    marketplace: eyre::Result<Marketplace<InMemoryEscrowClient>>,
) -> eyre::Result<()> {
    let market = marketplace?;
    let c1 = client("C1")?;
    let e1 = executor("E1")?;
    let task = market.lifecycle.create(&c1, logo_request()?).await?;

    eyre::ensure!(
        market.board.board_for(&e1).await?.len() == 1,
        "open task visible to executors"
    );
    market.lifecycle.respond(&e1, task.id(), "me").await?;
    eyre::ensure!(
        market.board.board_for(&e1).await?.is_empty(),
        "responded task hidden from responder"
    );
    eyre::ensure!(
        market.board.board_for(&c1).await?.len() == 1,
        "client sees own unfinished task"
    );

    market.lifecycle.select(&c1, task.id(), e1.wallet()).await?;
    market
        .lifecycle
        .submit_report(&e1, task.id(), ReportRef::new("logo.svg")?)
        .await?;
    market.lifecycle.confirm(&c1, task.id()).await?;

    eyre::ensure!(market.board.board_for(&c1).await?.is_empty(), "completed leaves board");
    eyre::ensure!(
        market.board.completed_tasks(e1.wallet()).await?.len() == 1,
        "completed view"
    );
    eyre::ensure!(
        market.board.awaiting_rating(c1.wallet()).await?.len() == 1,
        "client still owes a rating"
    );
    Ok(())
}
