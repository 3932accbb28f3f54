//! View a single user command.

use anyhow::{Context as _, Result};
use tracing::instrument;
use userdash_business::{OperationKind, User, UserDashboard, UserId};

use crate::context::{ensure_settled, flush_and_await};
use crate::output::Output;

/// Fetches user `id` and waits for the outcome.
#[instrument(skip_all, name = "load_user", fields(user_id = id))]
pub async fn load_user(dashboard: &mut UserDashboard, id: UserId) -> Result<User> {
    dashboard.fetch_user_details(id);
    flush_and_await(dashboard).await;

    let state = dashboard.snapshot();
    ensure_settled(&state, OperationKind::Detail)?;
    state
        .selected_user
        .context("Detail fetch did not complete")
}

fn print_user(out: &Output, user: &User) {
    out.header(format!("{} (@{})", user.name, user.username));
    out.divider(50);
    out.labeled_indent("ID", user.id, 2);
    out.labeled_indent("Email", &user.email, 2);
    out.labeled_indent("Phone", &user.phone, 2);
    out.labeled_indent("Website", &user.website, 2);
    out.labeled_indent("Company", &user.company.name, 2);
    out.labeled_indent("Catch phrase", &user.company.catch_phrase, 4);
    out.labeled_indent(
        "Address",
        format!(
            "{}, {}, {} {}",
            user.address.street, user.address.suite, user.address.city, user.address.zipcode
        ),
        2,
    );
}

#[instrument(skip_all, name = "view", fields(user_id = id))]
pub async fn run_view(dashboard: &mut UserDashboard, id: UserId) -> Result<()> {
    let out = Output::new();

    let user = load_user(dashboard, id).await?;
    print_user(&out, &user);

    // Leaving the detail view
    dashboard.clear_selected_user();
    Ok(())
}
