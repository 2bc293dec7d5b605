//! When steps for task lifecycle BDD scenarios.

use super::world::{MarketplaceWorld, run_async};
use rstest_bdd_macros::when;
use taskmarket::task::{
    domain::{ActorContext, Amount, Deadline, Rating, ReportRef, Task, WalletAddress},
    services::{CreateTaskRequest, TaskLifecycleError},
};

type Attempt = Result<Result<Task, TaskLifecycleError>, eyre::Report>;

pub(super) fn client(wallet: &str) -> Result<ActorContext, eyre::Report> {
    Ok(ActorContext::client(WalletAddress::new(wallet)?))
}

pub(super) fn executor(wallet: &str) -> Result<ActorContext, eyre::Report> {
    Ok(ActorContext::executor(WalletAddress::new(wallet)?))
}

pub(super) fn post_task(
    world: &MarketplaceWorld,
    wallet: &str,
    title: &str,
    amount: &str,
    deadline: &str,
) -> Attempt {
    let request = CreateTaskRequest::new(
        title,
        format!("{title} for the scenario"),
        Amount::parse(amount)?,
        Deadline::try_from(deadline)?,
    );
    Ok(run_async(world.lifecycle.create(&client(wallet)?, request)))
}

pub(super) fn respond(world: &MarketplaceWorld, wallet: &str, message: &str) -> Attempt {
    let task_id = world.task_id()?;
    Ok(run_async(world.lifecycle.respond(
        &executor(wallet)?,
        task_id,
        message.to_owned(),
    )))
}

pub(super) fn select(world: &MarketplaceWorld, actor: &ActorContext, chosen: &str) -> Attempt {
    let task_id = world.task_id()?;
    let chosen_wallet = WalletAddress::new(chosen)?;
    Ok(run_async(world.lifecycle.select(actor, task_id, &chosen_wallet)))
}

pub(super) fn submit(world: &MarketplaceWorld, wallet: &str, report: &str) -> Attempt {
    let task_id = world.task_id()?;
    Ok(run_async(world.lifecycle.submit_report(
        &executor(wallet)?,
        task_id,
        ReportRef::new(report)?,
    )))
}

pub(super) fn confirm(world: &MarketplaceWorld, wallet: &str) -> Attempt {
    let task_id = world.task_id()?;
    Ok(run_async(world.lifecycle.confirm(&client(wallet)?, task_id)))
}

pub(super) fn rate(world: &MarketplaceWorld, actor: &ActorContext, score: i64) -> Attempt {
    let task_id = world.task_id()?;
    Ok(run_async(world.lifecycle.rate(actor, task_id, Rating::new(score)?)))
}

pub(super) fn send_chat(
    world: &MarketplaceWorld,
    actor: &ActorContext,
    text: &str,
) -> Result<Result<(), TaskLifecycleError>, eyre::Report> {
    let task_id = world.task_id()?;
    Ok(run_async(world.chat.post_message(actor, task_id, text.to_owned())).map(|_| ()))
}

#[when(r#"client "{wallet}" posts a task titled "{title}" worth "{amount}" due "{deadline}""#)]
fn client_posts_task(
    world: &mut MarketplaceWorld,
    wallet: String,
    title: String,
    amount: String,
    deadline: String,
) -> Result<(), eyre::Report> {
    let result = post_task(world, &wallet, &title, &amount, &deadline)?;
    world.record(result);
    Ok(())
}

#[when(r#"executor "{wallet}" responds with "{message}""#)]
fn executor_responds(
    world: &mut MarketplaceWorld,
    wallet: String,
    message: String,
) -> Result<(), eyre::Report> {
    let result = respond(world, &wallet, &message)?;
    world.record(result);
    Ok(())
}

#[when(r#"client "{wallet}" selects executor "{chosen}""#)]
fn client_selects(
    world: &mut MarketplaceWorld,
    wallet: String,
    chosen: String,
) -> Result<(), eyre::Report> {
    let result = select(world, &client(&wallet)?, &chosen)?;
    world.record(result);
    Ok(())
}

#[when(r#"executor "{wallet}" selects executor "{chosen}""#)]
fn executor_selects(
    world: &mut MarketplaceWorld,
    wallet: String,
    chosen: String,
) -> Result<(), eyre::Report> {
    let result = select(world, &executor(&wallet)?, &chosen)?;
    world.record(result);
    Ok(())
}

#[when(r#"client "{wallet}" confirms the task"#)]
fn client_confirms(world: &mut MarketplaceWorld, wallet: String) -> Result<(), eyre::Report> {
    let result = confirm(world, &wallet)?;
    world.record(result);
    Ok(())
}

#[when(r#"client "{wallet}" rates the task {score:i64}"#)]
fn client_rates(
    world: &mut MarketplaceWorld,
    wallet: String,
    score: i64,
) -> Result<(), eyre::Report> {
    let result = rate(world, &client(&wallet)?, score)?;
    world.record(result);
    Ok(())
}

#[when(r#"executor "{wallet}" sends chat message "{text}""#)]
fn executor_sends_chat(
    world: &mut MarketplaceWorld,
    wallet: String,
    text: String,
) -> Result<(), eyre::Report> {
    let outcome = send_chat(world, &executor(&wallet)?, &text)?;
    world.last_outcome = Some(outcome);
    Ok(())
}
