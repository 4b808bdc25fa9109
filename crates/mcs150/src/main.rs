//! `mcs150` - CLI for MCS-150 filings
//!
//! This binary walks a carrier through the MCS-150 wizard against the filing
//! backend and gives administrators the dashboard, user management,
//! statistics and notifications.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use serde::Serialize;

use mcs150::account::{self, RegistrationForm};
use mcs150::admin::{self, stats, users, Dimension, NewUser, Page, PasswordReset, StatsFilter, UserPatch};
use mcs150::api::{AdminUser, Backend, HttpBackend, Profile};
use mcs150::carrier::catalog::{self, CodeEntry};
use mcs150::carrier::{DriverField, Ownership, VehicleClass};
use mcs150::cli::{
    AdminCommand, Cli, Command, ConfigCommand, EditCommand, FilingCommand, HistoryCommand,
    NotificationsCommand, OutputFormat, ProfileCommand, StatsCommand, UsersCommand,
};
use mcs150::error::LOGIN_ROUTE;
use mcs150::notify::{self, Inbox, NotificationCategory, NotificationPoller};
use mcs150::wizard::{
    self, Advance, CarrierInfo, ChangeSelection, EditSession, FormPreview, Section, SuccessPage,
    TextField,
};
use mcs150::{history, init_logging, session, Config, Error, Notice, Result, Store};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    if let Command::Config(config_cmd) = cli.command {
        handle_config(&config, config_cmd)?;
        return Ok(ExitCode::SUCCESS);
    }

    let db_path = config.database_path();
    let store = Store::open(&db_path)
        .with_context(|| format!("failed to open wizard state at {}", db_path.display()))?;
    let backend = HttpBackend::new(&config, store.credential()?)
        .context("failed to build the backend client")?;
    let app = App {
        config,
        store,
        backend,
    };

    // Execute the command
    match app.run(cli.command).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            report(&err);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Everything a command handler needs.
#[derive(Debug)]
struct App {
    config: Config,
    store: Store,
    backend: HttpBackend,
}

impl App {
    async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Login(cmd) => {
                let signed_in =
                    account::login(&self.store, &self.backend, &cmd.email, &cmd.password).await?;
                show(&signed_in.outcome.notice);
                goto(signed_in.outcome.route);
            }
            Command::Register(cmd) => {
                let form = RegistrationForm {
                    first_name: cmd.first_name,
                    last_name: cmd.last_name,
                    email: cmd.email,
                    password: cmd.password,
                    confirm_password: cmd.confirm_password,
                };
                let outcome = account::register(&self.backend, &form).await?;
                show(&outcome.notice);
                goto(outcome.route);
            }
            Command::Logout => goto(account::logout(&self.store)?),
            Command::Whoami { json } => {
                let session = session::gate(&self.store)?;
                if json {
                    print_json(&session)?;
                } else {
                    println!("{} <{}>", session.display_name(), session.email);
                    println!(
                        "Role: {}",
                        if session.is_admin { "administrator" } else { "user" }
                    );
                    if let Some(expires) = session.expires_at {
                        println!("Expires: {}", expires.format("%Y-%m-%d %H:%M UTC"));
                    }
                }
            }
            Command::Profile(cmd) => self.profile(cmd).await?,
            Command::Filing(cmd) => self.filing(cmd).await?,
            Command::History(cmd) => self.history(cmd).await?,
            Command::Notifications(cmd) => self.notifications(cmd).await?,
            Command::Admin(cmd) => self.admin(cmd).await?,
            Command::Config(cmd) => handle_config(&self.config, cmd)?,
        }
        Ok(())
    }

    async fn profile(&self, cmd: ProfileCommand) -> Result<()> {
        match cmd {
            ProfileCommand::Show { json } => {
                let profile = account::profile(&self.store, &self.backend).await?;
                if json {
                    print_json(&profile)?;
                } else {
                    println!("First name: {}", profile.first_name);
                    println!("Last name:  {}", profile.last_name);
                    println!("Email:      {}", profile.email);
                }
            }
            ProfileCommand::Update {
                first_name,
                last_name,
                email,
            } => {
                let profile = Profile {
                    first_name,
                    last_name,
                    email,
                };
                show(&account::update_profile(&self.store, &self.backend, &profile).await?);
            }
            ProfileCommand::Password {
                current,
                new,
                confirm,
            } => {
                let notice =
                    account::change_password(&self.store, &self.backend, &current, &new, &confirm)
                        .await?;
                show(&notice);
            }
        }
        Ok(())
    }

    async fn filing(&self, cmd: FilingCommand) -> Result<()> {
        let store = &self.store;
        match cmd {
            FilingCommand::New { usdot, email } => {
                advance(&wizard::lookup(store, &self.backend, &usdot, &email).await?);
            }
            FilingCommand::Info { mileage, ein } => {
                let info = CarrierInfo::load(store)?;
                match mileage {
                    Some(mileage) => advance(&info.submit(store, &mileage, ein.as_deref())?),
                    None => {
                        println!("USDOT number:       {}", info.usdot);
                        println!("Mileage:            {}", blank(&info.mileage));
                        println!(
                            "Employer ID number: {}{}",
                            blank(&info.employer),
                            if info.employer_locked { " (from lookup)" } else { "" }
                        );
                    }
                }
            }
            FilingCommand::Preview { json } => {
                let preview = FormPreview::load(store, &self.config.form)?;
                if json {
                    print_json(preview.data())?;
                } else {
                    print!("{}", preview.render());
                }
            }
            FilingCommand::Generate => {
                let mut preview = FormPreview::load(store, &self.config.form)?;
                advance(&preview.generate(store, &self.backend).await?);
            }
            FilingCommand::Changes { sections } => {
                let mut selection = ChangeSelection::open(store)?;
                if sections.is_empty() {
                    for section in Section::ALL {
                        println!("  {:<15} {}", section.id(), section.label());
                    }
                    return Ok(());
                }
                for raw in &sections {
                    selection.toggle(raw.parse()?);
                }
                advance(&selection.confirm(store)?);
            }
            FilingCommand::Edit(cmd) => edit(store, cmd)?,
            FilingCommand::Success => {
                let page = SuccessPage::open(store)?;
                println!("USDOT number: {}", page.usdot);
                println!("Generated:    {}", page.filing_name);
                println!("Saves as:     {}", page.file_name());
            }
            FilingCommand::Download { dir } => {
                let page = SuccessPage::open(store)?;
                let (path, notice) = page.download(&self.backend, &self.dir(dir)).await?;
                show(&notice);
                println!("{}", path.display());
            }
            FilingCommand::StartOver => advance(&wizard::start_over(store)?),
            FilingCommand::Status { json } => {
                let slots = wizard::status(store)?;
                let resume = wizard::resume_point(store)?;
                if json {
                    let slots: serde_json::Map<String, serde_json::Value> = slots
                        .iter()
                        .map(|(slot, present)| (slot.key().to_string(), (*present).into()))
                        .collect();
                    print_json(&serde_json::json!({
                        "slots": slots,
                        "resume": resume.route(),
                    }))?;
                } else {
                    for (slot, present) in &slots {
                        println!("  {:<16} {}", slot.key(), if *present { "set" } else { "-" });
                    }
                    println!("Resume at: {}", resume.route());
                }
            }
        }
        Ok(())
    }

    async fn history(&self, cmd: HistoryCommand) -> Result<()> {
        match cmd {
            HistoryCommand::List {
                search,
                page,
                format,
            } => {
                let records = history::list(&self.store, &self.backend).await?;
                let rows = history::search(&records, search.as_deref().unwrap_or_default());
                let page = Page::of(&rows, page, self.config.admin.page_size);
                match format {
                    OutputFormat::Json => print_json(page.items)?,
                    OutputFormat::Table => {
                        println!(
                            "{:<10} {:<28} {:>10} {:<12} {:<10} {:<22} FILE",
                            "USDOT", "EMAIL", "MILEAGE", "EIN", "STATUS", "CREATED"
                        );
                        for r in page.items {
                            println!(
                                "{:<10} {:<28} {:>10} {:<12} {:<10} {:<22} {}",
                                r.usdot_number,
                                r.carrier_email,
                                r.carrier_mileage,
                                r.carrier_ein,
                                history::status_label(r.status),
                                history::display_date(&r.created_at),
                                r.filing_path
                            );
                        }
                        println!("{}", page.footer());
                    }
                    OutputFormat::Plain => {
                        for r in page.items {
                            println!(
                                "{} {} {} {}",
                                r.usdot_number,
                                history::status_label(r.status),
                                history::display_date(&r.created_at),
                                r.filing_path
                            );
                        }
                    }
                }
            }
            HistoryCommand::Download { path, dir } => {
                let saved =
                    history::download(&self.store, &self.backend, &path, &self.dir(dir)).await?;
                println!("{}", saved.display());
            }
            HistoryCommand::View { path } => {
                history::view(&self.store, &self.backend, &path).await?;
                println!("{}", self.backend.url(&format!("/filing/generated/{path}")));
            }
            HistoryCommand::Export { dir } => {
                let saved = history::export(&self.store, &self.backend, &self.dir(dir)).await?;
                println!("{}", saved.display());
            }
        }
        Ok(())
    }

    async fn admin(&self, cmd: AdminCommand) -> Result<()> {
        match cmd {
            AdminCommand::Dashboard { format } => {
                let dashboard = admin::dashboard(&self.store, &self.backend).await?;
                if format == OutputFormat::Json {
                    return print_json(&dashboard);
                }
                println!("Total users:    {}", dashboard.stats.total_users);
                println!("Active users:   {}", dashboard.stats.active_users);
                println!("PDFs generated: {}", dashboard.stats.pdf_generated);
                println!();
                println!("Recent users:");
                print_users(&dashboard.recent_users, format);
            }
            AdminCommand::Users(cmd) => self.users(cmd).await?,
            AdminCommand::Stats(cmd) => self.stats(&cmd).await?,
        }
        Ok(())
    }

    async fn users(&self, cmd: UsersCommand) -> Result<()> {
        let (store, backend) = (&self.store, &self.backend);
        let notice = match cmd {
            UsersCommand::List { page, format } => {
                let all = users::list(store, backend).await?;
                let page = Page::of(&all, page, self.config.admin.page_size);
                if format == OutputFormat::Json {
                    return print_json(page.items);
                }
                print_users(page.items, format);
                if format == OutputFormat::Table {
                    println!("{}", page.footer());
                }
                return Ok(());
            }
            UsersCommand::Add {
                first_name,
                last_name,
                email,
                password,
                confirm_password,
                admin,
                active,
            } => {
                let user = NewUser {
                    first_name,
                    last_name,
                    email,
                    password,
                    confirm_password,
                    is_admin: admin,
                    active,
                };
                users::add(store, backend, &user).await?
            }
            UsersCommand::Update {
                id,
                first_name,
                last_name,
                email,
                admin,
                active,
            } => {
                let patch = UserPatch {
                    first_name,
                    last_name,
                    email,
                    is_admin: admin,
                    active,
                };
                users::update(store, backend, id, &patch).await?
            }
            UsersCommand::ResetPassword {
                id,
                password,
                confirm_password,
            } => {
                let reset = PasswordReset {
                    id,
                    password,
                    confirm_password,
                };
                users::reset_password(store, backend, &reset).await?
            }
            UsersCommand::Delete { id } => users::delete(store, backend, id).await?,
        };
        show(&notice);
        Ok(())
    }

    async fn stats(&self, cmd: &StatsCommand) -> Result<()> {
        let dimension: Dimension = cmd.by.parse()?;
        let records = stats::load(&self.store, &self.backend).await?;

        let mut filter = StatsFilter::default();
        filter.set_user(&cmd.user);
        filter.set_usdot(&cmd.usdot);
        // Year resets month and day, month resets day.
        filter.set_year(&cmd.year);
        filter.set_month(&cmd.month);
        filter.set_day(&cmd.day);

        let rows = filter.apply(&records);
        let summary = stats::summarize(&rows);
        let groups = stats::group_by(&rows, dimension);

        match cmd.format {
            OutputFormat::Json => {
                #[derive(Serialize)]
                struct Report<'a> {
                    by: Dimension,
                    filter: &'a StatsFilter,
                    summary: stats::Summary,
                    groups: &'a [(String, usize)],
                }
                print_json(&Report {
                    by: dimension,
                    filter: &filter,
                    summary,
                    groups: &groups,
                })?;
            }
            OutputFormat::Table => {
                println!("PDFs generated: {}", summary.total);
                println!("USDOT numbers:  {}", summary.unique_usdots);
                println!("Users:          {}", summary.unique_users);
                println!();
                println!("{:<32} {:>6}", dimension.to_string().to_uppercase(), "PDFS");
                for (key, count) in &groups {
                    println!("{key:<32} {count:>6}");
                }
            }
            OutputFormat::Plain => {
                for (key, count) in &groups {
                    println!("{key}\t{count}");
                }
            }
        }
        Ok(())
    }

    async fn notifications(&self, cmd: NotificationsCommand) -> Result<()> {
        let (store, backend) = (&self.store, &self.backend);
        let inbox = match cmd {
            NotificationsCommand::List { category, format } => {
                let category: NotificationCategory = category.parse()?;
                let inbox = notify::fetch(store, backend).await?;
                print_notifications(&inbox, category, format)?;
                return Ok(());
            }
            NotificationsCommand::Read { id } => notify::mark_read(store, backend, id).await?,
            NotificationsCommand::ReadAll => notify::mark_all_read(store, backend).await?,
            NotificationsCommand::Dismiss { id } => notify::dismiss(store, backend, id).await?,
            NotificationsCommand::DismissAll => notify::dismiss_all(store, backend).await?,
            NotificationsCommand::Watch => return self.watch().await,
        };
        println!("{} unread", inbox.unread_count(NotificationCategory::All));
        Ok(())
    }

    async fn watch(&self) -> Result<()> {
        session::gate(&self.store)?;
        let backend: Arc<dyn Backend> = Arc::new(self.backend.clone());
        let (poller, mut rx) = NotificationPoller::new(backend, self.config.poll_interval());
        let handle = poller.handle();
        let task = tokio::spawn(poller.run());

        loop {
            tokio::select! {
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = rx.borrow_and_update().clone();
                    if let Some(inbox) = snapshot {
                        println!(
                            "[{}] {} unread of {}",
                            Utc::now().format("%H:%M:%S"),
                            inbox.unread_count(NotificationCategory::All),
                            inbox.all().len()
                        );
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    handle.stop();
                    break;
                }
            }
        }

        drop(rx);
        task.abort();
        Ok(())
    }

    fn dir(&self, dir: Option<PathBuf>) -> PathBuf {
        dir.unwrap_or_else(|| self.config.download_dir())
    }
}

fn edit(store: &Store, cmd: EditCommand) -> Result<()> {
    let mut session = EditSession::open(store)?;
    match cmd {
        EditCommand::Show => {}
        EditCommand::Next => {
            session.next()?;
        }
        EditCommand::Prev => {
            session.prev()?;
        }
        EditCommand::Goto { section } => session.goto(section.parse()?)?,
        EditCommand::Set { field, value } => {
            let field: TextField = field.parse()?;
            session.set_text(field, &value)?;
        }
        EditCommand::MailingSame { same } => session.set_mailing_same(same)?,
        EditCommand::Ein { value } => session.set_employer(&value)?,
        EditCommand::Operation { value } => session.set_operation(&value)?,
        EditCommand::Classification { value } => session.toggle_classification(&value)?,
        EditCommand::Cargo { value } => session.toggle_cargo(&value)?,
        EditCommand::OtherCargo { checked } => session.set_other_cargo_checked(checked)?,
        EditCommand::Vehicle {
            ownership,
            class,
            value,
        } => {
            let ownership: Ownership = ownership.parse()?;
            let class: VehicleClass = class.parse()?;
            session.set_vehicle(ownership, class, &value)?;
        }
        EditCommand::Driver { field, value } => {
            let field: DriverField = field.parse()?;
            session.set_driver(field, &value)?;
        }
        EditCommand::Save { more } => {
            advance(&session.save(more)?);
            return Ok(());
        }
    }
    print_section(&session);
    Ok(())
}

fn print_section(session: &EditSession<'_>) {
    let section = session.current();
    let data = session.draft();
    println!(
        "Section {} of {}: {}",
        session.position() + 1,
        session.sections().len(),
        section.label()
    );

    for field in TextField::ALL.into_iter().filter(|f| f.section() == section) {
        println!("  {:<18} {}", field.key(), blank(field.value(data)));
    }
    match section {
        Section::Address => println!("  {:<18} {}", "mailing-same", data.mailing.is_same),
        Section::Ein => println!("  {:<18} {}", "ein", blank(session.employer())),
        Section::Operations => print_codes(&catalog::OPERATIONS, |e| {
            data.operation.eq_ignore_ascii_case(e.letter)
        }),
        Section::Classification => print_codes(&catalog::CLASSIFICATIONS, |e| {
            data.classifications.iter().any(|c| c == e.label)
        }),
        Section::Cargo => {
            print_codes(&catalog::CARGO, |e| data.cargo.iter().any(|c| c == e.label));
            println!("  {:<18} {}", "other-checked", data.other_cargo_checked());
        }
        Section::Trucks => {
            for class in VehicleClass::ALL {
                let counts: Vec<String> = Ownership::ALL
                    .into_iter()
                    .map(|o| format!("{:>6}", blank(data.vehicles.get(o, class))))
                    .collect();
                println!("  {:<28}{}", class.label(), counts.join(""));
            }
        }
        Section::Drivers => {
            for field in DriverField::ALL {
                println!("  {:<30} {}", field.key(), blank(data.drivers.get(field)));
            }
        }
        Section::Name | Section::Phone => {}
    }

    let mut nav = Vec::new();
    if session.can_prev() {
        nav.push("prev");
    }
    if session.can_next() {
        nav.push("next");
    }
    nav.push("save");
    println!("({})", nav.join(" | "));
}

fn print_codes(entries: &[CodeEntry], checked: impl Fn(&CodeEntry) -> bool) {
    for entry in entries {
        let mark = if checked(entry) { "[X]" } else { "[ ]" };
        println!("  {mark} {:>2}. {}", entry.letter, entry.label);
    }
}

fn print_users(users: &[AdminUser], format: OutputFormat) {
    match format {
        OutputFormat::Table | OutputFormat::Json => {
            println!(
                "{:>5} {:<24} {:<30} {:<6} {:<9} {:<22}",
                "ID", "NAME", "EMAIL", "ADMIN", "STATUS", "LAST LOGIN"
            );
            for u in users {
                println!(
                    "{:>5} {:<24} {:<30} {:<6} {:<9} {:<22}",
                    u.id,
                    u.display_name(),
                    u.email,
                    if u.is_admin { "yes" } else { "no" },
                    u.status_label(),
                    u.last_login
                        .as_deref()
                        .map_or_else(|| "Never".to_string(), history::display_date)
                );
            }
        }
        OutputFormat::Plain => {
            for u in users {
                println!("{} {} <{}> {}", u.id, u.display_name(), u.email, u.status_label());
            }
        }
    }
}

fn print_notifications(
    inbox: &Inbox,
    category: NotificationCategory,
    format: OutputFormat,
) -> Result<()> {
    let rows = inbox.filter(category);
    if format == OutputFormat::Json {
        return print_json(&rows);
    }

    let now = Utc::now();
    for n in &rows {
        let mark = if n.read { " " } else { "*" };
        match format {
            OutputFormat::Table => println!(
                "{mark} {:>5} {:<9} {:<16} {} - {}",
                n.id,
                n.category,
                notify::time_ago(&n.time, now),
                n.title,
                n.description
            ),
            _ => println!("{mark} {} {}", n.id, n.title),
        }
    }
    println!("{} unread", inbox.unread_count(category));
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                print_json(config)?;
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[API]");
                println!("  Base URL:           {}", config.base_url());
                println!("  Timeout (secs):     {}", config.request_timeout().as_secs());
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Download directory: {}", config.download_dir().display());
                println!();
                println!("[Notifications]");
                println!("  Poll interval (ms): {}", config.poll_interval().as_millis());
                println!();
                println!("[Admin]");
                println!("  Page size:          {}", config.admin.page_size);
                println!();
                println!("[Form]");
                println!("  Derive Class 9:     {}", config.form.derive_class9_hazmat);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

fn show(notice: &Notice) {
    println!("{notice}");
}

fn goto(route: &str) {
    println!("-> {route}");
}

fn advance(advance: &Advance) {
    if let Some(notice) = &advance.notice {
        show(notice);
    }
    goto(advance.to.route());
}

fn blank(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a failed command the way the site would show it: a redirect
/// silently moves the user, anything else raises a notice.
fn report(err: &Error) {
    if let Some(route) = err.redirect() {
        goto(route);
        return;
    }
    if let Some(notice) = err.notice() {
        show(&notice);
    }
    if err.is_unauthorized() {
        goto(LOGIN_ROUTE);
    }
}
