//! List users command.

use anyhow::Result;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::instrument;
use userdash_business::{ClientState, OperationKind, PageNumber, User, UserDashboard};

use crate::context::{ensure_settled, flush_and_await};
use crate::output::Output;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Company")]
    company: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: truncate_str(&user.name, 24),
            username: user.username.clone(),
            email: user.email.clone(),
            company: truncate_str(&user.company.name, 24),
        }
    }
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{truncated}...")
    } else {
        s.to_owned()
    }
}

fn render_table(users: &[User]) -> String {
    let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    table.to_string()
}

fn print_page(out: &Output, state: &ClientState) {
    if state.users.is_empty() {
        out.dim(format!("No users on page {}.", state.current_page));
    } else {
        out.newline();
        out.print(render_table(&state.users));
    }
    out.page_footer(state.current_page, state.total_pages, state.users.len());
}

/// Fetches `page` and waits for the outcome.
#[instrument(skip_all, name = "load_page", fields(page = %page))]
pub async fn load_page(dashboard: &mut UserDashboard, page: PageNumber) -> Result<ClientState> {
    dashboard.go_to_page(page);
    flush_and_await(dashboard).await;

    let state = dashboard.snapshot();
    ensure_settled(&state, OperationKind::List)?;
    Ok(state)
}

/// Fetches every page after the current one and collects the states.
#[instrument(skip_all, name = "load_remaining")]
pub async fn load_remaining(dashboard: &mut UserDashboard) -> Result<Vec<ClientState>> {
    let mut pages = Vec::new();
    while dashboard.next_page().is_some() {
        flush_and_await(dashboard).await;
        let state = dashboard.snapshot();
        ensure_settled(&state, OperationKind::List)?;
        pages.push(state);
    }
    Ok(pages)
}

#[instrument(skip_all, name = "list", fields(page = %page, all = all))]
pub async fn run_list(dashboard: &mut UserDashboard, page: PageNumber, all: bool) -> Result<()> {
    let out = Output::new();

    let first = load_page(dashboard, page).await?;
    print_page(&out, &first);

    if all {
        for state in load_remaining(dashboard).await? {
            print_page(&out, &state);
        }
    }

    Ok(())
}
