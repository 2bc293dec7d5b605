//! Shared fixtures for in-memory marketplace integration tests.

use std::sync::Arc;
use std::time::Duration;

use mockable::DefaultClock;
use rstest::fixture;
use taskmarket::{
    config::{DEFAULT_DEPOSIT_TIMEOUT, MarketplaceConfig},
    task::{
        adapters::memory::{InMemoryEscrowClient, InMemoryTaskRepository},
        domain::{ActorContext, Amount, Deadline, WalletAddress},
        ports::EscrowClient,
        services::{
            ChatService, CreateTaskRequest, RatingAggregator, TaskBoardService,
            TaskLifecycleService,
        },
    },
};
use tracing_subscriber::EnvFilter;

/// Lifecycle service wired to the in-memory Task Store.
pub type Lifecycle<E> = TaskLifecycleService<InMemoryTaskRepository, E, DefaultClock>;

/// Every marketplace service sharing one in-memory Task Store.
pub struct Marketplace<E>
where
    E: EscrowClient,
{
    pub repository: Arc<InMemoryTaskRepository>,
    pub escrow: Arc<E>,
    pub lifecycle: Lifecycle<E>,
    pub chat: ChatService<InMemoryTaskRepository, DefaultClock>,
    pub board: TaskBoardService<InMemoryTaskRepository>,
    pub ratings: RatingAggregator<InMemoryTaskRepository>,
}

impl<E> Marketplace<E>
where
    E: EscrowClient,
{
    /// Wires the services around `escrow`.
    ///
    /// # Errors
    ///
    /// Returns an error if the escrow address fails validation.
    pub fn with_escrow(escrow: E) -> eyre::Result<Self> {
        Self::with_escrow_and_timeout(escrow, DEFAULT_DEPOSIT_TIMEOUT)
    }

    /// Wires the services around `escrow` with a custom deposit timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the escrow address fails validation.
    pub fn with_escrow_and_timeout(escrow: E, deposit_timeout: Duration) -> eyre::Result<Self> {
        init_tracing();
        let config = MarketplaceConfig::new(WalletAddress::new("EQ-escrow")?)
            .with_deposit_timeout(deposit_timeout);
        let repository = Arc::new(InMemoryTaskRepository::new());
        let escrow = Arc::new(escrow);
        let clock = Arc::new(DefaultClock);
        Ok(Self {
            lifecycle: TaskLifecycleService::new(
                Arc::clone(&repository),
                Arc::clone(&escrow),
                Arc::clone(&clock),
                config.clone(),
            ),
            chat: ChatService::new(Arc::clone(&repository), clock, config.max_message_chars),
            board: TaskBoardService::new(Arc::clone(&repository)),
            ratings: RatingAggregator::new(Arc::clone(&repository)),
            repository,
            escrow,
        })
    }
}

/// Provides a marketplace whose escrow accepts every deposit.
///
/// # Errors
///
/// Returns an error if the services cannot be wired.
#[fixture]
pub fn marketplace() -> eyre::Result<Marketplace<InMemoryEscrowClient>> {
    Marketplace::with_escrow(InMemoryEscrowClient::new())
}

/// Installs a test-writer subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _already_installed = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Builds a validated wallet address.
///
/// # Errors
///
/// Returns an error if `value` is not a valid address.
pub fn wallet(value: &str) -> eyre::Result<WalletAddress> {
    Ok(WalletAddress::new(value)?)
}

/// Builds a client-role actor.
///
/// # Errors
///
/// Returns an error if `value` is not a valid address.
pub fn client(value: &str) -> eyre::Result<ActorContext> {
    Ok(ActorContext::client(wallet(value)?))
}

/// Builds an executor-role actor.
///
/// # Errors
///
/// Returns an error if `value` is not a valid address.
pub fn executor(value: &str) -> eyre::Result<ActorContext> {
    Ok(ActorContext::executor(wallet(value)?))
}

/// The "Design logo" listing: 5 units, short term.
///
/// # Errors
///
/// Returns an error if the amount cannot be built.
pub fn logo_request() -> eyre::Result<CreateTaskRequest> {
    Ok(CreateTaskRequest::new(
        "Design logo",
        "Vector logo for a coffee shop",
        Amount::parse("5")?,
        Deadline::try_from("short_term")?,
    ))
}
