//! Integration tests for deriving actor context from the identity provider.

use super::helpers::{logo_request, marketplace, Marketplace, wallet};
use rstest::rstest;
use taskmarket::task::{
    adapters::memory::{InMemoryEscrowClient, StaticIdentityProvider},
    domain::{ActorContext, RejectionKind, Role, TaskDomainError},
    ports::IdentityProvider,
};

#[rstest]
fn disconnected_session_has_no_actor() {
    let provider = StaticIdentityProvider::new();

    let result = ActorContext::from_provider(&provider);

    assert_eq!(result, Err(TaskDomainError::MissingIdentity));
    assert_eq!(provider.current_role(), Role::Client);
}

#[rstest]
fn role_switch_changes_the_derived_actor() -> eyre::Result<()> {
    let provider = StaticIdentityProvider::connected(wallet("W1")?, Role::Client);
    let as_client = ActorContext::from_provider(&provider)?;

    provider.set_role(Role::Executor);
    let as_executor = ActorContext::from_provider(&provider)?;

    eyre::ensure!(as_client.role() == Role::Client, "starts as client");
    eyre::ensure!(as_executor.role() == Role::Executor, "switched to executor");
    eyre::ensure!(as_client.wallet() == as_executor.wallet(), "same wallet");
    Ok(())
}

#[rstest]
fn disconnect_resets_role() -> eyre::Result<()> {
    let provider = StaticIdentityProvider::connected(wallet("W1")?, Role::Executor);

    provider.disconnect();

    eyre::ensure!(provider.current_identity().is_none(), "wallet cleared");
    eyre::ensure!(provider.current_role() == Role::Client, "role reset");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn session_role_gates_task_creation(
    marketplace: eyre::Result<Marketplace<InMemoryEscrowClient>>,
) -> eyre::Result<()> {
    let market = marketplace?;
    let provider = StaticIdentityProvider::connected(wallet("W1")?, Role::Executor);

    let as_executor = ActorContext::from_provider(&provider)?;
    let refused = market.lifecycle.create(&as_executor, logo_request()?).await;
    let kind = refused.err().and_then(|err| err.rejection_kind());
    eyre::ensure!(
        kind == Some(RejectionKind::Authorization),
        "executor role may not create, got {kind:?}"
    );

    provider.set_role(Role::Client);
    let as_client = ActorContext::from_provider(&provider)?;
    let task = market.lifecycle.create(&as_client, logo_request()?).await?;
    eyre::ensure!(task.creator().as_str() == "W1", "task owned by W1");
    Ok(())
}
