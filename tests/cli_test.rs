//! CLI parsing and the runner against a mock server with a temp store.

mod common;

use gestor::adapters::FileStore;
use gestor::auth::SessionManager;
use gestor::cli::args::{ItemsCommand, LoansCommand};
use clap::error::ErrorKind;
use gestor::cli::{help_text, parse_args, CliCommand, Prompt, Runner};
use gestor::domain::StockThresholds;
use serde_json::json;
use std::io;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{api, items_json};

fn args(line: &str) -> Result<CliCommand, clap::Error> {
    parse_args(std::iter::once("gestor").chain(line.split_whitespace()))
}

/// Answers every prompt with the same text.
struct FixedPrompt(&'static str);

impl Prompt for FixedPrompt {
    fn password(&self, _label: &str) -> io::Result<String> {
        Ok(self.0.to_string())
    }

    fn line(&self, _label: &str) -> io::Result<String> {
        Ok(self.0.to_string())
    }
}

#[test]
fn test_parse_full_command_line() {
    assert_eq!(
        args("items list --filtro=cable").unwrap(),
        CliCommand::Items(ItemsCommand::List {
            filtro: Some("cable".to_string())
        })
    );
    assert!(matches!(
        args("prestamos devolver l1 2"),
        Ok(CliCommand::Loans(LoansCommand::Return { .. }))
    ));
    assert_eq!(
        args("prestamos prestar").unwrap_err().kind(),
        ErrorKind::InvalidSubcommand
    );
}

#[test]
fn test_option_missing_its_value_is_rejected() {
    let err = args("items add --descripcion --cantidad 5").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidValue);
    assert!(err.to_string().contains("--descripcion"));
    // Usage errors exit with status 2.
    assert_eq!(err.exit_code(), 2);

    assert!(args("items add --descripcion --cantidad").is_err());
    assert!(
        args("prestamos add --item i1 --persona --prestado 2 --vence 2025-12-31").is_err()
    );
}

#[test]
fn test_help_lists_sections() {
    let help = help_text();
    for section in ["items", "solicitudes", "prestamos", "usuarios", "resumen"] {
        assert!(help.contains(section), "missing {section}");
    }
    assert_eq!(args("--help").unwrap_err().exit_code(), 0);
}

#[tokio::test]
async fn test_login_then_list_uses_stored_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "jwt-9",
            "user": {"_id": "u1", "nombre": "Ana", "usuario": "ana", "rol": "invitado"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/items"))
        .and(header("Authorization", "Bearer jwt-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(items_json()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut first = Runner::new(
        api(&server),
        SessionManager::restore(FileStore::in_dir(dir.path())),
        StockThresholds::default(),
        FixedPrompt("secreto"),
    );
    first.execute(args("login ana").unwrap()).await.unwrap();

    // A later invocation restores the session from disk.
    let mut second = Runner::new(
        api(&server),
        SessionManager::restore(FileStore::in_dir(dir.path())),
        StockThresholds::default(),
        FixedPrompt(""),
    );
    assert!(second.session().is_authenticated());
    second.execute(args("items list").unwrap()).await.unwrap();
}

#[tokio::test]
async fn test_guest_status_change_is_refused() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut runner = Runner::new(
        api(&server),
        SessionManager::restore(FileStore::in_dir(dir.path())),
        StockThresholds::default(),
        FixedPrompt(""),
    );
    let err = runner
        .execute(args("solicitudes aprobar r1").unwrap())
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Solo admin/encargado autenticados pueden cambiar el estado de solicitudes."
    );
}
