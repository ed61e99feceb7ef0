//! Command-line interface for Gestor.
//!
//! - Argument parsing
//! - Command dispatch against the REST API through the view-models
//! - Table rendering and interactive prompts
//!
//! # Usage
//!
//! ```ignore
//! use gestor::cli::{parse_args, run};
//! use gestor::config::AppConfig;
//!
//! let config = AppConfig::from_env();
//! let command = parse_args(std::env::args()).unwrap_or_else(|e| e.exit());
//! if let Err(e) = run(command, &config).await {
//!     eprintln!("✗ {}", e);
//!     std::process::exit(1);
//! }
//! ```

pub mod args;
pub mod prompt;
pub mod tables;
pub mod version;

pub use args::{help_text, parse_args, CliCommand};
pub use prompt::{Prompt, TerminalPrompt};
pub use version::{version_line, VERSION};

use std::sync::Arc;

use chrono::Utc;
use color_eyre::eyre::{eyre, Report};
use color_eyre::Result;

use crate::adapters::{FileStore, ReqwestHttpClient};
use crate::api::ApiClient;
use crate::auth::{Session, SessionManager};
use crate::cli_output::{icons, print_field, print_flash, print_header, print_line, print_table};
use crate::config::AppConfig;
use crate::domain::StockThresholds;
use crate::error::{ErrorCategory, GestorError, GestorResult};
use crate::traits::{HttpClient, LocalStore};
use crate::views::{
    error_text, Feedback, InventoryView, ItemForm, LoansView, RequestsView, ReturnOutcome,
    Summary, UserForm, UsersView, ViewContext,
};
use args::{ItemsCommand, LoansCommand, RequestsCommand, UsersCommand};
use tables::{
    item_row, loan_row, request_row, user_row, ITEM_HEADERS, LOAN_HEADERS, REQUEST_HEADERS,
    USER_HEADERS,
};

/// Run a parsed command against the configured server.
pub async fn run(command: CliCommand, config: &AppConfig) -> Result<()> {
    match command {
        CliCommand::Version => {
            println!("{}", version_line());
            return Ok(());
        }
        CliCommand::Help => {
            println!("{}", help_text());
            return Ok(());
        }
        _ => {}
    }

    let http = ReqwestHttpClient::with_timeout(config.timeout)?;
    let api = ApiClient::new(Arc::new(http), &config.api_url);
    let store = match &config.home {
        Some(dir) => FileStore::in_dir(dir),
        None => FileStore::new()?,
    };
    tracing::debug!(api_url = %config.api_url, store = %store.path().display(), "starting");
    let mut runner = Runner::new(
        api,
        SessionManager::restore(store),
        config.thresholds,
        TerminalPrompt,
    );
    runner.execute(command).await
}

/// Executes commands for one stored session.
pub struct Runner<H, S, P> {
    api: ApiClient<H>,
    sessions: SessionManager<S>,
    thresholds: StockThresholds,
    prompt: P,
}

impl<H: HttpClient, S: LocalStore, P: Prompt> Runner<H, S, P> {
    pub fn new(
        api: ApiClient<H>,
        sessions: SessionManager<S>,
        thresholds: StockThresholds,
        prompt: P,
    ) -> Self {
        Self {
            api,
            sessions,
            thresholds,
            prompt,
        }
    }

    pub fn session(&self) -> &Session {
        self.sessions.session()
    }

    fn context(&self) -> ViewContext<H> {
        ViewContext::new(
            self.api.clone(),
            self.sessions.session().clone(),
            self.thresholds,
        )
    }

    pub async fn execute(&mut self, command: CliCommand) -> Result<()> {
        match command {
            CliCommand::Version => println!("{}", version_line()),
            CliCommand::Help => println!("{}", help_text()),
            CliCommand::Login { usuario } => self.login(&usuario).await?,
            CliCommand::Logout => self.logout(),
            CliCommand::WhoAmI => self.whoami(),
            CliCommand::Summary => self.summary().await?,
            CliCommand::Items(cmd) => self.items(cmd).await?,
            CliCommand::Requests(cmd) => self.requests(cmd).await?,
            CliCommand::Loans(cmd) => self.loans(cmd).await?,
            CliCommand::Users(cmd) => self.users(cmd).await?,
        }
        Ok(())
    }

    async fn login(&mut self, usuario: &str) -> Result<()> {
        let password = self.prompt.password("Contraseña: ")?;
        let user = self
            .sessions
            .login(&self.api, usuario, &password)
            .await
            .map_err(|e| failure(&e, error_text(&e, "No se pudo iniciar sesión.")))?;
        print_line(
            icons::SUCCESS,
            &format!("Sesión iniciada como {} ({}).", user.nombre, user.rol),
        );
        Ok(())
    }

    fn logout(&mut self) {
        if !self.sessions.is_authenticated() {
            print_line(icons::INFO, "No había una sesión iniciada.");
            return;
        }
        self.sessions.logout();
        print_line(icons::SUCCESS, "Sesión cerrada.");
    }

    fn whoami(&self) {
        let session = self.sessions.session();
        match (&session.user, session.is_authenticated()) {
            (Some(user), true) => {
                print_header("SESIÓN");
                print_field("Nombre", &user.nombre);
                print_field("Usuario", &user.usuario);
                print_field("Rol", user.rol.as_str());
                print_field("Servidor", self.api.base_url());
            }
            _ => print_line(icons::INFO, "No hay sesión iniciada."),
        }
    }

    async fn summary(&self) -> Result<()> {
        let s = Summary::load(&self.context(), Utc::now())
            .await
            .map_err(|e| failure(&e, error_text(&e, "Error al cargar el resumen.")))?;
        print_header("RESUMEN");
        print_field("Ítems", &s.items.to_string());
        print_field("Stock bajo", &s.items_bajo.to_string());
        print_field("Crítico", &s.items_critico.to_string());
        print_field("Pendientes", &s.requests_pendientes.to_string());
        print_field("En curso", &s.loans_en_curso.to_string());
        print_field("Vencidos", &s.loans_vencidos.to_string());
        if s.has_alerts() {
            println!();
            print_line(icons::WARNING, "Hay stock bajo o préstamos vencidos.");
        }
        Ok(())
    }

    async fn items(&self, cmd: ItemsCommand) -> Result<()> {
        let mut view = InventoryView::new(self.context());
        match cmd {
            ItemsCommand::List { filtro } => {
                view.set_filter(filtro.unwrap_or_default());
                let result = view.load().await;
                report(view.feedback(), result)?;
                let rows: Vec<Vec<String>> = view
                    .filtered()
                    .into_iter()
                    .map(|item| item_row(item, self.thresholds))
                    .collect();
                print_header("INVENTARIO");
                print_table(ITEM_HEADERS, &rows, "No hay ítems.");
                if view.has_alerts() {
                    println!();
                    print_line(icons::WARNING, "Hay ítems con stock bajo o crítico.");
                }
            }
            ItemsCommand::Add(fields) => {
                let form = fields.apply(ItemForm::default());
                let result = view.create(&form).await;
                report(view.feedback(), result)?;
            }
            ItemsCommand::Edit { id, fields } => {
                let result = view.load().await;
                report(view.feedback(), result)?;
                let base = view
                    .item(&id)
                    .map(ItemForm::from_item)
                    .ok_or_else(|| eyre!("Ítem no encontrado."))?;
                let result = view.update(&id, &fields.apply(base)).await;
                report(view.feedback(), result)?;
            }
            ItemsCommand::Remove { id } => {
                let result = view.delete(&id).await;
                report(view.feedback(), result)?;
            }
        }
        Ok(())
    }

    async fn requests(&self, cmd: RequestsCommand) -> Result<()> {
        let mut view = RequestsView::new(self.context());
        match cmd {
            RequestsCommand::List { filtro } => {
                view.set_filter(filtro.unwrap_or_default());
                let result = view.load().await;
                report(view.feedback(), result)?;
                let rows: Vec<Vec<String>> = view
                    .filtered()
                    .into_iter()
                    .map(|r| request_row(r, view.item_name(r)))
                    .collect();
                print_header("SOLICITUDES");
                print_table(REQUEST_HEADERS, &rows, "No hay solicitudes.");
            }
            RequestsCommand::Add(form) => {
                let result = view.create(&form).await;
                report(view.feedback(), result)?;
            }
            RequestsCommand::SetStatus { id, estado } => {
                let result = view.set_status(&id, estado).await;
                report(view.feedback(), result)?;
            }
            RequestsCommand::Remove { id } => {
                let result = view.delete(&id).await;
                report(view.feedback(), result)?;
            }
        }
        Ok(())
    }

    async fn loans(&self, cmd: LoansCommand) -> Result<()> {
        let mut view = LoansView::new(self.context());
        match cmd {
            LoansCommand::List { filtro } => {
                view.set_filter(filtro.unwrap_or_default());
                let result = view.load().await;
                report(view.feedback(), result)?;
                let rows: Vec<Vec<String>> =
                    view.filtered(Utc::now()).iter().map(loan_row).collect();
                print_header("PRÉSTAMOS");
                print_table(LOAN_HEADERS, &rows, "No hay préstamos.");
            }
            LoansCommand::Add(form) => {
                let result = view.create(&form).await;
                report(view.feedback(), result)?;
            }
            LoansCommand::Return { id, cantidad } => {
                let result = view.load().await;
                report(view.feedback(), result)?;
                let entry = match (cantidad, view.loan(&id).map(|l| l.pendiente())) {
                    (Some(c), _) => c,
                    (None, Some(pendiente)) if pendiente > 0 => self.prompt.line(&format!(
                        "Cantidad devuelta (pendiente {}, vacío cancela): ",
                        pendiente
                    ))?,
                    (None, _) => String::new(),
                };
                let result = view.register_return(&id, &entry).await;
                match report(view.feedback(), result)? {
                    ReturnOutcome::Registered {
                        cantidad,
                        clamped: true,
                    } => print_line(
                        icons::WARNING,
                        &format!("Se registraron solo las {} unidades pendientes.", cantidad),
                    ),
                    ReturnOutcome::Cancelled => print_line(icons::INFO, "Devolución cancelada."),
                    ReturnOutcome::Registered { .. } | ReturnOutcome::NothingPending => {}
                }
            }
            LoansCommand::Remove { id } => {
                let result = view.delete(&id).await;
                report(view.feedback(), result)?;
            }
        }
        Ok(())
    }

    async fn users(&self, cmd: UsersCommand) -> Result<()> {
        let ctx = self.context();
        let is_admin = ctx.is_admin();
        let mut view = UsersView::new(ctx);
        match cmd {
            UsersCommand::List { filtro } => {
                view.set_filter(filtro.unwrap_or_default());
                let result = view.load().await;
                report(view.feedback(), result)?;
                let rows: Vec<Vec<String>> = view.filtered().into_iter().map(user_row).collect();
                print_header("USUARIOS");
                print_table(USER_HEADERS, &rows, "No hay usuarios.");
            }
            UsersCommand::Add(fields) => {
                let mut form = fields.apply(UserForm::default());
                if is_admin {
                    form.password = self.prompt.password("Contraseña del nuevo usuario: ")?;
                }
                let result = view.create(&form).await;
                report(view.feedback(), result)?;
            }
            UsersCommand::Edit {
                id,
                fields,
                change_password,
            } => {
                let result = view.load().await;
                report(view.feedback(), result)?;
                let base = view
                    .user(&id)
                    .map(UserForm::from_user)
                    .ok_or_else(|| eyre!("Usuario no encontrado."))?;
                let mut form = fields.apply(base);
                if change_password {
                    form.password = self.prompt.password("Nueva contraseña: ")?;
                }
                let result = view.update(&id, &form).await;
                report(view.feedback(), result)?;
            }
            UsersCommand::Remove { id } => {
                let result = view.load().await;
                report(view.feedback(), result)?;
                let result = view.delete(&id).await;
                report(view.feedback(), result)?;
            }
        }
        Ok(())
    }
}

/// Print the view's flash on success; turn a failure into the banner text.
fn report<T>(feedback: &Feedback, result: GestorResult<T>) -> Result<T> {
    match result {
        Ok(value) => {
            if let Some(flash) = feedback.flash() {
                print_flash(flash);
            }
            Ok(value)
        }
        Err(err) => {
            let message = feedback
                .flash()
                .map(|f| f.message.clone())
                .or_else(|| feedback.error().map(str::to_string))
                .unwrap_or_else(|| err.user_message());
            Err(failure(&err, message))
        }
    }
}

/// Error report for `message`, with a hint when the server is unreachable
/// or failing.
fn failure(err: &GestorError, message: String) -> Report {
    match err.category() {
        ErrorCategory::Network | ErrorCategory::Server => {
            eyre!("{}\n  {}", message, err.recovery_hint())
        }
        _ => eyre!(message),
    }
}
