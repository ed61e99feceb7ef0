//! Command-line argument parsing for the Gestor CLI.
//!
//! Commands are `gestor <section> <action> [args] [--flag value]`. Field
//! values are passed through as typed; the view-models validate them.

use std::ffi::OsString;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::models::{RequestStatus, Role};
use crate::views::{ItemForm, LoanForm, RequestForm, UserForm};

const ENV_HELP: &str = "\
Entorno:
  GESTOR_API_URL          URL base del servidor
  GESTOR_HOME             Directorio del almacenamiento local
  GESTOR_UMBRAL_BAJO      Umbral de stock bajo por defecto
  GESTOR_UMBRAL_CRITICO   Umbral de stock crítico por defecto
  GESTOR_TIMEOUT_SECS     Tiempo máximo por petición
  GESTOR_LOG              Filtro de logs (como RUST_LOG)";

#[derive(Debug, Parser)]
#[command(name = "gestor")]
#[command(about = "Cliente de inventario y préstamos")]
#[command(disable_version_flag = true)]
#[command(after_help = ENV_HELP)]
struct Cli {
    /// Muestra la versión
    #[arg(short = 'V', long)]
    version: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Inicia sesión; la contraseña se pide sin eco
    Login { usuario: String },
    /// Cierra la sesión guardada
    Logout,
    /// Muestra el usuario de la sesión
    Whoami,
    /// Cuenta ítems en alerta, solicitudes pendientes y préstamos
    Resumen,
    #[command(subcommand)]
    Items(ItemsArgs),
    #[command(subcommand)]
    Solicitudes(RequestsArgs),
    #[command(subcommand)]
    Prestamos(LoansArgs),
    #[command(subcommand)]
    Usuarios(UsersArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    #[arg(long, value_name = "Q")]
    filtro: Option<String>,
}

#[derive(Debug, Subcommand)]
enum ItemsArgs {
    #[command(visible_alias = "ls")]
    List(ListArgs),
    Add(ItemFields),
    /// Los campos omitidos conservan su valor
    Edit {
        id: String,
        #[command(flatten)]
        fields: ItemFields,
    },
    Rm { id: String },
}

#[derive(Debug, Subcommand)]
enum RequestsArgs {
    #[command(visible_alias = "ls")]
    List(ListArgs),
    Add(RequestArgs),
    Estado {
        id: String,
        #[arg(value_enum)]
        estado: RequestStatus,
    },
    Aprobar { id: String },
    Rechazar { id: String },
    Completar { id: String },
    Rm { id: String },
}

#[derive(Debug, Args)]
struct RequestArgs {
    /// prestamo, devolucion o baja
    #[arg(long)]
    tipo: Option<String>,
    #[arg(long, value_name = "ID")]
    item: Option<String>,
    #[arg(long)]
    persona: Option<String>,
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    cantidad: Option<String>,
    #[arg(long)]
    observacion: Option<String>,
}

#[derive(Debug, Subcommand)]
enum LoansArgs {
    #[command(visible_alias = "ls")]
    List(ListArgs),
    Add(LoanArgs),
    /// Sin cantidad, se pide mostrando lo pendiente
    Devolver {
        id: String,
        #[arg(allow_negative_numbers = true)]
        cantidad: Option<String>,
    },
    Rm { id: String },
}

#[derive(Debug, Args)]
struct LoanArgs {
    #[arg(long, value_name = "ID")]
    item: Option<String>,
    #[arg(long)]
    persona: Option<String>,
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    prestado: Option<String>,
    #[arg(long, value_name = "AAAA-MM-DD")]
    vence: Option<String>,
    #[arg(long)]
    observacion: Option<String>,
}

#[derive(Debug, Subcommand)]
enum UsersArgs {
    #[command(visible_alias = "ls")]
    List(ListArgs),
    /// La contraseña se pide sin eco
    Add {
        #[arg(long)]
        nombre: Option<String>,
        #[arg(long)]
        usuario: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, value_enum)]
        rol: Option<Role>,
        #[command(flatten)]
        estado: ActiveFlags,
    },
    Edit {
        id: String,
        #[arg(long)]
        nombre: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, value_enum)]
        rol: Option<Role>,
        #[command(flatten)]
        estado: ActiveFlags,
        /// Pide una contraseña nueva
        #[arg(long)]
        password: bool,
    },
    Rm { id: String },
}

#[derive(Debug, Args)]
struct ActiveFlags {
    #[arg(long, conflicts_with = "inactivo")]
    activo: bool,
    #[arg(long)]
    inactivo: bool,
}

impl ActiveFlags {
    fn value(&self) -> Option<bool> {
        match (self.activo, self.inactivo) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Version,
    Help,
    Login { usuario: String },
    Logout,
    WhoAmI,
    Summary,
    Items(ItemsCommand),
    Requests(RequestsCommand),
    Loans(LoansCommand),
    Users(UsersCommand),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemsCommand {
    List { filtro: Option<String> },
    Add(ItemFields),
    Edit { id: String, fields: ItemFields },
    Remove { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestsCommand {
    List { filtro: Option<String> },
    Add(RequestForm),
    SetStatus { id: String, estado: RequestStatus },
    Remove { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoansCommand {
    List { filtro: Option<String> },
    Add(LoanForm),
    /// `cantidad` is prompted for when absent.
    Return { id: String, cantidad: Option<String> },
    Remove { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsersCommand {
    List { filtro: Option<String> },
    /// The password is always prompted for.
    Add(UserFields),
    Edit {
        id: String,
        fields: UserFields,
        change_password: bool,
    },
    Remove { id: String },
}

/// Item fields given on the command line; absent ones keep the base value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct ItemFields {
    #[arg(long)]
    pub descripcion: Option<String>,
    #[arg(long)]
    pub categoria: Option<String>,
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub cantidad: Option<String>,
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub minimo: Option<String>,
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub critico: Option<String>,
    #[arg(long)]
    pub responsable: Option<String>,
    #[arg(long)]
    pub observacion: Option<String>,
}

impl ItemFields {
    pub fn apply(&self, base: ItemForm) -> ItemForm {
        ItemForm {
            descripcion: self.descripcion.clone().unwrap_or(base.descripcion),
            categoria: self.categoria.clone().unwrap_or(base.categoria),
            cantidad: self.cantidad.clone().unwrap_or(base.cantidad),
            minimo: self.minimo.clone().unwrap_or(base.minimo),
            critico: self.critico.clone().unwrap_or(base.critico),
            responsable: self.responsable.clone().unwrap_or(base.responsable),
            observacion: self.observacion.clone().unwrap_or(base.observacion),
        }
    }
}

/// User fields given on the command line; absent ones keep the base value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFields {
    pub nombre: Option<String>,
    pub usuario: Option<String>,
    pub email: Option<String>,
    pub rol: Option<Role>,
    pub activo: Option<bool>,
}

impl UserFields {
    pub fn apply(&self, base: UserForm) -> UserForm {
        UserForm {
            nombre: self.nombre.clone().unwrap_or(base.nombre),
            usuario: self.usuario.clone().unwrap_or(base.usuario),
            email: self.email.clone().unwrap_or(base.email),
            rol: self.rol.unwrap_or(base.rol),
            activo: self.activo.unwrap_or(base.activo),
            password: base.password,
        }
    }
}

/// Rendered `--help` text.
pub fn help_text() -> String {
    Cli::command().render_long_help().to_string()
}

/// Parse command-line arguments (including the program name).
///
/// `--help` comes back as an error of kind `DisplayHelp`, like any clap
/// command; no arguments at all gives [`CliCommand::Help`].
///
/// # Examples
///
/// ```
/// use gestor::cli::args::{parse_args, CliCommand};
///
/// let command = parse_args(["gestor", "--version"]).unwrap();
/// assert_eq!(command, CliCommand::Version);
/// ```
pub fn parse_args<I, T>(args: I) -> Result<CliCommand, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args)?;
    if cli.version {
        return Ok(CliCommand::Version);
    }
    Ok(match cli.command {
        None => CliCommand::Help,
        Some(Command::Login { usuario }) => CliCommand::Login { usuario },
        Some(Command::Logout) => CliCommand::Logout,
        Some(Command::Whoami) => CliCommand::WhoAmI,
        Some(Command::Resumen) => CliCommand::Summary,
        Some(Command::Items(args)) => CliCommand::Items(items_command(args)),
        Some(Command::Solicitudes(args)) => CliCommand::Requests(requests_command(args)),
        Some(Command::Prestamos(args)) => CliCommand::Loans(loans_command(args)),
        Some(Command::Usuarios(args)) => CliCommand::Users(users_command(args)),
    })
}

fn items_command(args: ItemsArgs) -> ItemsCommand {
    match args {
        ItemsArgs::List(list) => ItemsCommand::List {
            filtro: list.filtro,
        },
        ItemsArgs::Add(fields) => ItemsCommand::Add(fields),
        ItemsArgs::Edit { id, fields } => ItemsCommand::Edit { id, fields },
        ItemsArgs::Rm { id } => ItemsCommand::Remove { id },
    }
}

fn requests_command(args: RequestsArgs) -> RequestsCommand {
    let set = |id, estado| RequestsCommand::SetStatus { id, estado };
    match args {
        RequestsArgs::List(list) => RequestsCommand::List {
            filtro: list.filtro,
        },
        RequestsArgs::Add(add) => RequestsCommand::Add(RequestForm {
            tipo: add.tipo.unwrap_or_default(),
            item: add.item.unwrap_or_default(),
            persona: add.persona.unwrap_or_default(),
            cantidad: add.cantidad.unwrap_or_default(),
            observacion: add.observacion.unwrap_or_default(),
        }),
        RequestsArgs::Estado { id, estado } => set(id, estado),
        RequestsArgs::Aprobar { id } => set(id, RequestStatus::Aprobada),
        RequestsArgs::Rechazar { id } => set(id, RequestStatus::Rechazada),
        RequestsArgs::Completar { id } => set(id, RequestStatus::Completa),
        RequestsArgs::Rm { id } => RequestsCommand::Remove { id },
    }
}

fn loans_command(args: LoansArgs) -> LoansCommand {
    match args {
        LoansArgs::List(list) => LoansCommand::List {
            filtro: list.filtro,
        },
        LoansArgs::Add(add) => LoansCommand::Add(LoanForm {
            item: add.item.unwrap_or_default(),
            persona: add.persona.unwrap_or_default(),
            prestado: add.prestado.unwrap_or_default(),
            fecha_vence: add.vence.unwrap_or_default(),
            observacion: add.observacion.unwrap_or_default(),
        }),
        LoansArgs::Devolver { id, cantidad } => LoansCommand::Return { id, cantidad },
        LoansArgs::Rm { id } => LoansCommand::Remove { id },
    }
}

fn users_command(args: UsersArgs) -> UsersCommand {
    match args {
        UsersArgs::List(list) => UsersCommand::List {
            filtro: list.filtro,
        },
        UsersArgs::Add {
            nombre,
            usuario,
            email,
            rol,
            estado,
        } => UsersCommand::Add(UserFields {
            nombre,
            usuario,
            email,
            rol,
            activo: estado.value(),
        }),
        UsersArgs::Edit {
            id,
            nombre,
            email,
            rol,
            estado,
            password,
        } => UsersCommand::Edit {
            id,
            fields: UserFields {
                nombre,
                usuario: None,
                email,
                rol,
                activo: estado.value(),
            },
            change_password: password,
        },
        UsersArgs::Rm { id } => UsersCommand::Remove { id },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(line: &str) -> Result<CliCommand, clap::Error> {
        parse_args(std::iter::once("gestor").chain(line.split_whitespace()))
    }

    fn kind(line: &str) -> ErrorKind {
        parse(line).unwrap_err().kind()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_version_flag() {
        assert_eq!(parse("--version").unwrap(), CliCommand::Version);
        assert_eq!(parse("-V").unwrap(), CliCommand::Version);
    }

    #[test]
    fn test_parse_help() {
        assert_eq!(parse("").unwrap(), CliCommand::Help);
        assert_eq!(kind("--help"), ErrorKind::DisplayHelp);
        assert!(help_text().contains("GESTOR_API_URL"));
    }

    #[test]
    fn test_parse_session_commands() {
        assert_eq!(
            parse("login ana").unwrap(),
            CliCommand::Login {
                usuario: "ana".to_string()
            }
        );
        assert_eq!(kind("login"), ErrorKind::MissingRequiredArgument);
        assert_eq!(parse("logout").unwrap(), CliCommand::Logout);
        assert_eq!(parse("whoami").unwrap(), CliCommand::WhoAmI);
        assert_eq!(parse("resumen").unwrap(), CliCommand::Summary);
        assert_eq!(kind("logout now"), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_parse_items() {
        assert_eq!(
            parse("items ls --filtro lab").unwrap(),
            CliCommand::Items(ItemsCommand::List {
                filtro: Some("lab".to_string())
            })
        );
        let cmd = parse("items edit 7 --cantidad=4 --responsable Ana").unwrap();
        let CliCommand::Items(ItemsCommand::Edit { id, fields }) = cmd else {
            panic!("expected items edit");
        };
        assert_eq!(id, "7");
        assert_eq!(fields.cantidad.as_deref(), Some("4"));
        assert_eq!(fields.responsable.as_deref(), Some("Ana"));
        assert_eq!(fields.descripcion, None);

        assert_eq!(kind("items add --color rojo"), ErrorKind::UnknownArgument);
        assert_eq!(kind("items add --descripcion"), ErrorKind::InvalidValue);
    }

    #[test]
    fn test_flag_is_not_taken_as_value() {
        assert!(parse("items add --descripcion --cantidad 5").is_err());
        assert!(parse("items add --descripcion --cantidad").is_err());
        assert!(parse("prestamos add --item i1 --persona --prestado 2 --vence 2025-12-31").is_err());
    }

    #[test]
    fn test_negative_numbers_reach_validation() {
        let cmd = parse("items add --descripcion Cable --cantidad -3").unwrap();
        let CliCommand::Items(ItemsCommand::Add(fields)) = cmd else {
            panic!("expected items add");
        };
        assert_eq!(fields.cantidad.as_deref(), Some("-3"));
    }

    #[test]
    fn test_item_fields_apply_keeps_base() {
        let base = ItemForm {
            descripcion: "Cable".to_string(),
            cantidad: "3".to_string(),
            ..Default::default()
        };
        let fields = ItemFields {
            cantidad: Some("9".to_string()),
            ..Default::default()
        };
        let form = fields.apply(base);
        assert_eq!(form.descripcion, "Cable");
        assert_eq!(form.cantidad, "9");
    }

    #[test]
    fn test_parse_requests() {
        assert_eq!(
            parse("solicitudes estado r1 rechazada").unwrap(),
            CliCommand::Requests(RequestsCommand::SetStatus {
                id: "r1".to_string(),
                estado: RequestStatus::Rechazada
            })
        );
        assert_eq!(
            parse("solicitudes aprobar r1").unwrap(),
            CliCommand::Requests(RequestsCommand::SetStatus {
                id: "r1".to_string(),
                estado: RequestStatus::Aprobada
            })
        );
        assert_eq!(kind("solicitudes estado r1 archivada"), ErrorKind::InvalidValue);
        let cmd = parse("solicitudes add --tipo baja --item i1 --persona Ana --cantidad 2").unwrap();
        let CliCommand::Requests(RequestsCommand::Add(form)) = cmd else {
            panic!("expected solicitudes add");
        };
        assert_eq!(form.tipo, "baja");
        assert_eq!(form.observacion, "");
    }

    #[test]
    fn test_parse_loans() {
        assert_eq!(
            parse("prestamos devolver l1").unwrap(),
            CliCommand::Loans(LoansCommand::Return {
                id: "l1".to_string(),
                cantidad: None
            })
        );
        assert_eq!(
            parse("prestamos devolver l1 2").unwrap(),
            CliCommand::Loans(LoansCommand::Return {
                id: "l1".to_string(),
                cantidad: Some("2".to_string())
            })
        );
        assert_eq!(kind("prestamos devolver l1 2 3"), ErrorKind::UnknownArgument);
        let cmd = parse("prestamos add --item i1 --persona Ana --prestado 1 --vence 2025-12-31").unwrap();
        let CliCommand::Loans(LoansCommand::Add(form)) = cmd else {
            panic!("expected prestamos add");
        };
        assert_eq!(form.fecha_vence, "2025-12-31");
    }

    #[test]
    fn test_parse_users() {
        let cmd = parse("usuarios add --nombre Eva --usuario eva --email e@x --rol encargado --inactivo")
            .unwrap();
        let CliCommand::Users(UsersCommand::Add(fields)) = cmd else {
            panic!("expected usuarios add");
        };
        assert_eq!(fields.rol, Some(Role::Encargado));
        assert_eq!(fields.activo, Some(false));

        assert_eq!(
            parse("usuarios edit u2 --password --activo").unwrap(),
            CliCommand::Users(UsersCommand::Edit {
                id: "u2".to_string(),
                fields: UserFields {
                    activo: Some(true),
                    ..Default::default()
                },
                change_password: true,
            })
        );

        assert_eq!(kind("usuarios add --rol root"), ErrorKind::InvalidValue);
        assert_eq!(
            kind("usuarios edit u2 --activo --inactivo"),
            ErrorKind::ArgumentConflict
        );
        assert_eq!(kind("usuarios edit u2 --usuario otro"), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(kind("bodega"), ErrorKind::InvalidSubcommand);
        assert!(parse("items").is_err());
    }
}
