mod output;
mod prompt;

use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use clap::{ArgAction, Parser, Subcommand};
use domain::{
    entity::EntityDefinition,
    field::FieldKind,
    models::EntityKind,
    record::{EntityRecord, ID_FIELD, RecordId},
    route::AppRoute,
};
use services::services::{
    auth::{AuthService, InvitationAcceptance, SignupRequest},
    config::Config,
    context::AdminContext,
    deletion::DeletionOutcome,
    entity_table::EntityTable,
    graphql::GraphQlClient,
    notification::NotificationService,
    session::SessionStore,
    side_panel::SubmitOutcome,
};
use strum::IntoEnumIterator;
use tracing::{debug, warn};

use crate::{
    output::{Spinner, TerminalNotifier, render_table},
    prompt::TerminalConfirmation,
};

#[derive(Parser)]
#[command(name = "critical-asset", version)]
#[command(about = "CriticalAsset back-office console")]
struct Cli {
    /// GraphQL endpoint of the admin API
    #[arg(long, global = true, env = "CRITICAL_ASSET_GRAPHQL_URL")]
    graphql_url: Option<String>,
    /// Base URL of the companion application
    #[arg(long, global = true, env = "CRITICAL_ASSET_COMPANION_URL")]
    companion_url: Option<String>,
    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    /// Mirror notifications to the desktop
    #[arg(long, global = true, default_value_t = false)]
    desktop_notifications: bool,
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// List the entities this console manages
    Entities,
    List {
        entity: EntityKind,
        #[arg(long)]
        search: Option<String>,
        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Create a record; prompts for every field unless --set is given
    Create {
        entity: EntityKind,
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },
    Update {
        entity: EntityKind,
        id: String,
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },
    Delete {
        entity: EntityKind,
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    Logout,
    Signup {
        #[arg(long)]
        company: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
    },
    ForgotPassword {
        email: String,
    },
    /// Set a new password from a reset link
    ResetPassword {
        link: String,
    },
    /// Join a company from an invitation link
    AcceptInvitation {
        link: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },
    /// Open any console link or path
    Open {
        link: String,
    },
    /// Print a companion application link carrying the session token
    Companion {
        #[arg(default_value = "/")]
        path: String,
    },
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got `{raw}`"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in `{raw}`"));
    }
    Ok((field.to_string(), value.to_string()))
}

struct Console {
    config: Config,
    session: SessionStore,
    ctx: AdminContext,
}

impl Console {
    fn new(cli: &Cli) -> Result<Self> {
        let mut config = Config::load().context("failed to load configuration")?;
        if let Some(url) = &cli.graphql_url {
            config.graphql_url = url.clone();
        }
        if let Some(url) = &cli.companion_url {
            config.companion_url = url.clone();
        }
        if let Some(secs) = cli.timeout_secs {
            config.request_timeout_secs = secs;
        }
        config.desktop_notifications |= cli.desktop_notifications;
        debug!(?config, "Resolved configuration");

        let session = SessionStore::default_location()?;
        let client = GraphQlClient::new(config.graphql_endpoint()?, config.request_timeout())?
            .with_access_token(session.load_token()?);
        debug!(endpoint = %client.endpoint(), "GraphQL client ready");
        let notifier = TerminalNotifier::new(NotificationService::new(config.desktop_notifications));
        let ctx = AdminContext::new(Arc::new(client), Arc::new(notifier));

        Ok(Self {
            config,
            session,
            ctx,
        })
    }

    fn auth(&self) -> AuthService {
        AuthService::new(self.ctx.transport.clone(), self.session.clone())
    }

    fn require_session(&self) -> Result<()> {
        if self.session.load_token()?.is_none() {
            bail!("not logged in; run `critical-asset login` first");
        }
        Ok(())
    }

    async fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Entities => {
                print_entities();
                Ok(())
            }
            Commands::List {
                entity,
                search,
                page,
                page_size,
            } => {
                self.require_session()?;
                self.list(entity, search, page, page_size).await
            }
            Commands::Create { entity, set } => {
                self.require_session()?;
                self.create(entity, set).await
            }
            Commands::Update { entity, id, set } => {
                self.require_session()?;
                self.update(entity, RecordId::new(id), set).await
            }
            Commands::Delete { entity, id, yes } => {
                self.require_session()?;
                self.delete(entity, RecordId::new(id), yes).await
            }
            Commands::Login { email } => self.login(email).await,
            Commands::Logout => {
                self.auth().logout()?;
                println!("Signed out");
                Ok(())
            }
            Commands::Signup {
                company,
                first_name,
                last_name,
                email,
            } => {
                let request = SignupRequest {
                    company_name: company,
                    first_name,
                    last_name,
                    email,
                    password: prompt::new_password()?,
                };
                let payload = self
                    .auth()
                    .signup(&request)
                    .await
                    .map_err(|e| anyhow!(e.user_message()))?;
                println!("Account created for {}", payload.user.email);
                Ok(())
            }
            Commands::ForgotPassword { email } => self.forgot_password(&email).await,
            Commands::ResetPassword { link } => match AppRoute::parse(&link)? {
                AppRoute::ResetPassword { token } => self.reset_password(&token).await,
                other => bail!("not a password reset link: {}", other.to_path()),
            },
            Commands::AcceptInvitation {
                link,
                first_name,
                last_name,
            } => match AppRoute::parse(&link)? {
                AppRoute::AcceptInvitation { token } => {
                    let acceptance = InvitationAcceptance {
                        first_name,
                        last_name,
                        password: prompt::new_password()?,
                    };
                    let payload = self
                        .auth()
                        .accept_invitation(&token, &acceptance)
                        .await
                        .map_err(|e| anyhow!(e.user_message()))?;
                    println!("Welcome, {}", payload.user.email);
                    Ok(())
                }
                other => bail!("not an invitation link: {}", other.to_path()),
            },
            Commands::Open { link } => self.open(&link).await,
            Commands::Companion { path } => {
                let link = self
                    .session
                    .companion_link(&self.config.companion_base()?, &path)?;
                println!("{link}");
                Ok(())
            }
        }
    }

    async fn open(&self, link: &str) -> Result<()> {
        let route = AppRoute::parse(link)?;
        if route.requires_session() {
            self.require_session()?;
        }
        match route {
            AppRoute::Login => self.login(None).await,
            AppRoute::Signup => bail!("use `critical-asset signup` with the account details"),
            AppRoute::ForgotPassword => self.forgot_password(&prompt::text("Email")?).await,
            AppRoute::ResetPassword { token } => self.reset_password(&token).await,
            AppRoute::AcceptInvitation { .. } => {
                bail!("use `critical-asset accept-invitation` with your name")
            }
            AppRoute::Entity(kind) => self.list(kind, None, 1, None).await,
        }
    }

    async fn login(&self, email: Option<String>) -> Result<()> {
        let email = match email {
            Some(email) => email,
            None => prompt::text("Email")?,
        };
        let password = prompt::password("Password")?;
        let payload = self
            .auth()
            .login(&email, &password)
            .await
            .map_err(|e| anyhow!(e.user_message()))?;
        println!("Signed in as {}", payload.user.email);
        Ok(())
    }

    async fn forgot_password(&self, email: &str) -> Result<()> {
        self.auth()
            .forgot_password(email)
            .await
            .map_err(|e| anyhow!(e.user_message()))?;
        println!("If {email} has an account, a reset link is on its way");
        Ok(())
    }

    async fn reset_password(&self, token: &str) -> Result<()> {
        let password = prompt::new_password()?;
        self.auth()
            .reset_password(token, &password)
            .await
            .map_err(|e| anyhow!(e.user_message()))?;
        println!("Password updated; log in with the new password");
        Ok(())
    }

    /// Load the list while the reference lookups are read in the background.
    async fn mount(&self, kind: EntityKind) -> Result<EntityTable> {
        let mut table = EntityTable::new(kind, &self.ctx);
        let lookups = tokio::spawn(table.lookups());
        if !table.mount().await {
            lookups.abort();
            bail!("could not load {}", kind.definition().plural_label);
        }
        match lookups.await {
            Ok(tables) => table.apply_lookups(tables),
            Err(e) => warn!(entity = %kind, error = %e, "Lookup task failed"),
        }
        Ok(table)
    }

    async fn list(
        &self,
        kind: EntityKind,
        search: Option<String>,
        page: usize,
        page_size: Option<usize>,
    ) -> Result<()> {
        let mut table = self.mount(kind).await?;
        let list = table.list_mut();
        list.set_page_size(page_size.unwrap_or(self.config.page_size));
        if let Some(term) = search {
            list.set_search(term);
        }
        list.set_page(page.saturating_sub(1));

        let definition = kind.definition();
        let columns = columns(definition);
        let headers: Vec<String> = std::iter::once("ID".to_string())
            .chain(columns.iter().map(|(_, label)| label.to_string()))
            .collect();
        let rows: Vec<Vec<String>> = list
            .page_rows()
            .into_iter()
            .map(|row| {
                std::iter::once(row.record.text(ID_FIELD).unwrap_or_default())
                    .chain(
                        columns
                            .iter()
                            .map(|(name, _)| list.display_value(row.record, name)),
                    )
                    .collect()
            })
            .collect();

        println!("{}", render_table(&headers, &rows));
        println!(
            "Page {} of {} ({} {})",
            list.current_page() + 1,
            list.page_count(),
            list.filtered_len(),
            definition.plural_label.to_lowercase()
        );
        Ok(())
    }

    async fn create(&self, kind: EntityKind, set: Vec<(String, String)>) -> Result<()> {
        let mut table = self.mount(kind).await?;
        table.open_create();
        self.fill(&mut table, set)?;
        self.save(&mut table).await
    }

    async fn update(&self, kind: EntityKind, id: RecordId, set: Vec<(String, String)>) -> Result<()> {
        let mut table = self.mount(kind).await?;
        if !table.open_edit(&id) {
            bail!("{} {id} not found", kind.definition().label);
        }
        self.fill(&mut table, set)?;
        self.save(&mut table).await
    }

    /// Fill the open panel from `--set` pairs or prompts. The panel is
    /// cancelled if filling fails.
    fn fill(&self, table: &mut EntityTable, set: Vec<(String, String)>) -> Result<()> {
        let filled = if set.is_empty() {
            prompt::fill_form(table)
        } else {
            apply_assignments(table, set)
        };
        if filled.is_err() {
            table.form_mut().cancel();
        }
        filled
    }

    async fn save(&self, table: &mut EntityTable) -> Result<()> {
        match table.submit().await {
            SubmitOutcome::Saved(record) => {
                print_record(table.definition(), &record);
                Ok(())
            }
            SubmitOutcome::Invalid(errors) => {
                for (field, message) in &errors {
                    eprintln!("  {field}: {message}");
                }
                bail!("{} field(s) need attention", errors.len())
            }
            SubmitOutcome::Failed(message) => Err(anyhow!(message)),
            SubmitOutcome::NotOpen => bail!("nothing to submit"),
        }
    }

    async fn delete(&self, kind: EntityKind, id: RecordId, yes: bool) -> Result<()> {
        let mut table = self.mount(kind).await?;
        match table.delete(&id, &TerminalConfirmation::new(yes)).await {
            DeletionOutcome::Deleted => Ok(()),
            DeletionOutcome::Cancelled => {
                println!("Cancelled");
                Ok(())
            }
            DeletionOutcome::Failed(message) => Err(anyhow!(message)),
        }
    }
}

/// Fields shown as grid columns; long text is left to the detail view.
fn columns(definition: &EntityDefinition) -> Vec<(&'static str, &'static str)> {
    definition
        .fields
        .iter()
        .filter(|field| field.kind != FieldKind::Multiline)
        .map(|field| (field.name, field.label))
        .collect()
}

/// `--set` accepts the form name (`iconName`) or the backend name (`icon_name`).
fn resolve_field(definition: &EntityDefinition, key: &str) -> Result<&'static str> {
    definition
        .field(key)
        .or_else(|| definition.fields.iter().find(|f| f.backend_name() == key))
        .map(|field| field.name)
        .ok_or_else(|| anyhow!("{} has no field `{key}`", definition.label))
}

fn print_entities() {
    let headers = vec!["Entity".to_string(), "Path".to_string(), "Kind".to_string()];
    let rows: Vec<Vec<String>> = EntityKind::iter()
        .map(|kind| {
            let definition = kind.definition();
            vec![
                kind.to_string(),
                format!("/{}", definition.slug),
                if kind.is_master_data() {
                    "master data"
                } else {
                    "administration"
                }
                .to_string(),
            ]
        })
        .collect();
    println!("{}", render_table(&headers, &rows));
}

fn apply_assignments(table: &mut EntityTable, set: Vec<(String, String)>) -> Result<()> {
    let definition = table.definition();
    for (key, value) in set {
        let field = resolve_field(definition, &key)?;
        table.form_mut().set_input(field, &value)?;
    }
    Ok(())
}

fn print_record(definition: &EntityDefinition, record: &EntityRecord) {
    let audit = [("Created", record.created_at()), ("Updated", record.updated_at())]
        .into_iter()
        .filter_map(|(label, at)| {
            at.map(|at| vec![label.to_string(), at.format("%Y-%m-%d %H:%M UTC").to_string()])
        });
    let rows: Vec<Vec<String>> = std::iter::once(vec![
        "ID".to_string(),
        record.text(ID_FIELD).unwrap_or_default(),
    ])
    .chain(definition.fields.iter().map(|field| {
        vec![
            field.label.to_string(),
            record.text(field.name).unwrap_or_default(),
        ]
    }))
    .chain(audit)
    .collect();
    println!(
        "{}",
        render_table(&["Field".to_string(), "Value".to_string()], &rows)
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    utils::logging::init(match cli.verbose {
        0 => "off",
        1 => "info",
        2 => "debug",
        _ => "trace",
    });

    let console = Console::new(&cli)?;
    let spinner = Spinner::spawn(console.ctx.busy.subscribe());
    let result = console.run(cli.command).await;
    spinner.stop().await;
    result
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_with_slug_style_kind() {
        let cli = Cli::try_parse_from([
            "critical-asset",
            "list",
            "asset-category",
            "--search",
            "hvac",
            "--page",
            "2",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Commands::List {
                entity: EntityKind::AssetCategory,
                search: Some("hvac".to_string()),
                page: 2,
                page_size: None,
            }
        );
    }

    #[test]
    fn test_parse_repeated_assignments() {
        let cli = Cli::try_parse_from([
            "critical-asset",
            "create",
            "vendor",
            "--set",
            "name=CoolAir",
            "--set",
            "email=sales@coolair.com",
        ])
        .unwrap();
        let Commands::Create { set, .. } = cli.command else {
            panic!("expected create");
        };
        assert_eq!(
            set,
            vec![
                ("name".to_string(), "CoolAir".to_string()),
                ("email".to_string(), "sales@coolair.com".to_string()),
            ]
        );
    }

    #[test]
    fn test_assignment_errors() {
        assert!(parse_assignment("name").is_err());
        assert!(parse_assignment("=x").is_err());
        assert_eq!(
            parse_assignment("formula=a=b").unwrap(),
            ("formula".to_string(), "a=b".to_string())
        );
    }

    #[test]
    fn test_resolve_field_accepts_both_casings() {
        let definition = EntityKind::AssetCategory.definition();
        assert_eq!(resolve_field(definition, "iconName").unwrap(), "iconName");
        assert_eq!(resolve_field(definition, "icon_name").unwrap(), "iconName");
        assert!(resolve_field(definition, "colour").is_err());
    }

    #[test]
    fn test_grid_columns_skip_long_text() {
        let names: Vec<&str> = columns(EntityKind::AssetCategory.definition())
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["name", "iconName", "iconColor", "iconType"]);
    }
}
