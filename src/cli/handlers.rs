use std::cell::Cell;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::controller::{Confirm, Dashboard, FormController, ListView, Notifier};
use crate::entity::{
    BoardMember, CouncilMember, DynamicForm, Event, FormResponse, LegislativeTerm, News,
    OfficialSymbol, OmbudsmanMessage, Page, Proposition, RecordId, TransparencyDocument,
    UserAccount,
};
use crate::error::{CamaraError, Notification, NotificationLevel, Result};
use crate::format::{capitalize, settings_sections, short_id, slugify, yes_no};
use crate::gateway::{Gateway, LocalAuth, SqliteGateway};
use crate::resource::{Deletable, Repository, Resource, ResourceKind, Toggle};
use crate::routes::Route;
use crate::rules;
use crate::session::{SessionContext, SessionGuard};

/// Bind `$R` to the entity type behind `$kind` and evaluate `$body`.
macro_rules! with_resource {
    ($kind:expr, $R:ident => $body:expr) => {
        match $kind {
            ResourceKind::News => { type $R = News; $body }
            ResourceKind::Pages => { type $R = Page; $body }
            ResourceKind::Propositions => { type $R = Proposition; $body }
            ResourceKind::CouncilMembers => { type $R = CouncilMember; $body }
            ResourceKind::BoardMembers => { type $R = BoardMember; $body }
            ResourceKind::Terms => { type $R = LegislativeTerm; $body }
            ResourceKind::Transparency => { type $R = TransparencyDocument; $body }
            ResourceKind::Symbols => { type $R = OfficialSymbol; $body }
            ResourceKind::Ombudsman => { type $R = OmbudsmanMessage; $body }
            ResourceKind::Forms => { type $R = DynamicForm; $body }
            ResourceKind::Agenda => { type $R = Event; $body }
            ResourceKind::Users => { type $R = UserAccount; $body }
            ResourceKind::FormResponses => { type $R = FormResponse; $body }
            ResourceKind::Settings => Err(read_only(ResourceKind::Settings)),
        }
    };
}

macro_rules! with_toggle {
    ($kind:expr, $R:ident => $body:expr) => {
        match $kind {
            ResourceKind::News => { type $R = News; $body }
            ResourceKind::Pages => { type $R = Page; $body }
            ResourceKind::CouncilMembers => { type $R = CouncilMember; $body }
            ResourceKind::BoardMembers => { type $R = BoardMember; $body }
            ResourceKind::Symbols => { type $R = OfficialSymbol; $body }
            ResourceKind::Forms => { type $R = DynamicForm; $body }
            ResourceKind::Agenda => { type $R = Event; $body }
            ResourceKind::Users => { type $R = UserAccount; $body }
            other => Err(CamaraError::InvalidResource(format!(
                "{} has no status toggle",
                other
            ))),
        }
    };
}

macro_rules! with_deletable {
    ($kind:expr, $R:ident => $body:expr) => {
        match $kind {
            ResourceKind::News => { type $R = News; $body }
            ResourceKind::Pages => { type $R = Page; $body }
            ResourceKind::Propositions => { type $R = Proposition; $body }
            ResourceKind::CouncilMembers => { type $R = CouncilMember; $body }
            ResourceKind::BoardMembers => { type $R = BoardMember; $body }
            ResourceKind::Terms => { type $R = LegislativeTerm; $body }
            ResourceKind::Transparency => { type $R = TransparencyDocument; $body }
            ResourceKind::Symbols => { type $R = OfficialSymbol; $body }
            ResourceKind::Forms => { type $R = DynamicForm; $body }
            ResourceKind::Agenda => { type $R = Event; $body }
            other => Err(CamaraError::InvalidResource(format!(
                "{} records cannot be deleted",
                other
            ))),
        }
    };
}

fn read_only(kind: ResourceKind) -> CamaraError {
    CamaraError::InvalidResource(format!("{} is read-only", kind))
}

fn parse_kind(resource: &str) -> Result<ResourceKind> {
    resource.parse().map_err(CamaraError::InvalidResource)
}

/// Prints notifications: successes to stdout, errors to stderr.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => println!("{}", notification),
            NotificationLevel::Error => eprintln!("Error: {}", notification),
        }
    }
}

/// y/N prompt on the terminal, skipped by `--force`.
struct ConsoleConfirm {
    force: bool,
    declined: Cell<bool>,
}

impl Confirm for ConsoleConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.force {
            return true;
        }
        eprintln!("{} [y/N] ", prompt);
        let mut input = String::new();
        let accepted = io::stdin().read_line(&mut input).is_ok()
            && matches!(input.trim().to_lowercase().as_str(), "y" | "yes" | "s" | "sim");
        self.declined.set(!accepted);
        accepted
    }
}

/// Store, identity provider and notification sink for one command.
struct App {
    gateway: Arc<dyn Gateway>,
    auth: LocalAuth,
    notifier: Arc<dyn Notifier>,
}

impl App {
    fn open(config: &AppConfig) -> Result<Self> {
        let gateway = SqliteGateway::open(&config.database)?;
        let auth = match &config.operator {
            Some(operator) => LocalAuth::signed_in(operator.to_user()),
            None => LocalAuth::signed_out(),
        };
        Ok(Self {
            gateway: Arc::new(gateway),
            auth,
            notifier: Arc::new(ConsoleNotifier),
        })
    }

    fn repo<R: Resource>(&self) -> Repository<R> {
        Repository::new(Arc::clone(&self.gateway))
    }

    /// Admin commands run behind the session guard; no session ends the
    /// command with a redirect to the login page.
    async fn guard(&self) -> Result<SessionGuard> {
        let guard = SessionGuard::mount(&self.auth, SessionContext::anonymous()).await;
        if !guard.is_authenticated() {
            eprintln!(
                "Not signed in (redirecting to {}). Configure an operator in camara.yaml or set CAMARA_OPERATOR_EMAIL and CAMARA_OPERATOR_ID.",
                Route::Login
            );
            return Err(CamaraError::NotAuthenticated);
        }
        Ok(guard)
    }
}

/// Accept a full UUID or a unique prefix of one.
async fn resolve_id<R: Resource>(app: &App, raw: &str) -> Result<RecordId> {
    if let Ok(id) = raw.parse::<Uuid>() {
        return Ok(id);
    }
    let needle = raw.trim().to_lowercase().replace('-', "");
    if needle.is_empty() {
        return Err(CamaraError::not_found(R::KIND.singular(), raw));
    }

    let items = app.repo::<R>().list_default().await?;
    let matches: Vec<RecordId> = items
        .iter()
        .filter_map(|r| r.id())
        .filter(|id| id.simple().to_string().starts_with(&needle))
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(CamaraError::not_found(R::KIND.singular(), raw)),
        many => Err(CamaraError::InvalidValue {
            field: "id".into(),
            message: format!("'{}' matches {} records", raw, many.len()),
        }),
    }
}

fn parse_assignment(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((column, value)) if !column.trim().is_empty() => {
            Ok((column.trim().to_string(), value.to_string()))
        }
        _ => Err(CamaraError::InvalidValue {
            field: raw.to_string(),
            message: "expected COLUMN=VALUE".into(),
        }),
    }
}

/// Text columns take the raw text; anything else is read as JSON when
/// it parses.
fn coerce(existing: Option<&Value>, raw: &str) -> Value {
    match existing {
        Some(Value::String(_)) => Value::String(raw.to_string()),
        _ => serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())),
    }
}

fn read_document(file: Option<PathBuf>, stdin: bool) -> Result<Value> {
    let raw = match (file, stdin) {
        (Some(path), _) => fs::read_to_string(path)?,
        (None, true) => {
            let mut content = String::new();
            io::stdin().read_to_string(&mut content)?;
            content
        }
        (None, false) => {
            return Err(CamaraError::InvalidValue {
                field: "input".into(),
                message: "use --file PATH or --stdin".into(),
            })
        }
    };
    Ok(serde_json::from_str(&raw)?)
}

pub fn handle_resources(json: bool) -> Result<()> {
    if json {
        let resources: Vec<Value> = ResourceKind::all()
            .iter()
            .map(|kind| {
                json!({
                    "resource": kind.slug(),
                    "name": kind.plural(),
                    "list": Route::AdminList(*kind).path(),
                    "create": kind.create_segment().map(|_| Route::AdminNew(*kind).path()),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&resources)?);
        return Ok(());
    }

    println!("Resources:\n");
    for kind in ResourceKind::all() {
        let create = match kind.create_segment() {
            Some(_) => Route::AdminNew(*kind).path(),
            None => "-".to_string(),
        };
        println!(
            "  {:<14} {:<18} {:<26} {}",
            kind.slug(),
            kind.plural(),
            Route::AdminList(*kind).path(),
            create
        );
    }
    Ok(())
}

async fn list_records<R: Resource>(app: &App, json: bool) -> Result<()> {
    let mut view = ListView::new(app.repo::<R>(), Arc::clone(&app.notifier));
    if !view.load().await {
        return Err(CamaraError::Aborted);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(view.items())?);
    } else if view.items().is_empty() {
        println!("No {} found.", R::KIND.plural());
    } else {
        println!("{}:\n", capitalize(R::KIND.plural()));
        for item in view.items() {
            let id = item.id().map(|id| short_id(&id)).unwrap_or_default();
            println!("  ({}) {}", id, item.title());
        }
    }
    Ok(())
}

fn list_settings(json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(settings_sections())?);
        return Ok(());
    }
    for section in settings_sections() {
        println!("{} - {}", section.title, section.description);
        for item in section.items {
            println!("    {}", item);
        }
    }
    Ok(())
}

pub async fn handle_list(config: &AppConfig, resource: String, json: bool) -> Result<()> {
    let kind = parse_kind(&resource)?;
    let app = App::open(config)?;
    let _guard = app.guard().await?;

    if kind == ResourceKind::Settings {
        return list_settings(json);
    }
    if let Some(parent) = kind.parent() {
        return Err(CamaraError::InvalidResource(format!(
            "{} are listed per {}: use `camara responses <ID>`",
            kind.plural(),
            parent.singular()
        )));
    }
    with_resource!(kind, R => list_records::<R>(&app, json).await)
}

async fn show_record<R: Resource>(app: &App, raw_id: &str, json: bool) -> Result<()> {
    let id = resolve_id::<R>(app, raw_id).await?;
    let record = app.repo::<R>().get(id).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("{} ({})\n", record.title(), id);
        print!("{}", serde_yaml::to_string(&record)?);
    }
    Ok(())
}

pub async fn handle_get(config: &AppConfig, resource: String, id: String, json: bool) -> Result<()> {
    let kind = parse_kind(&resource)?;
    let app = App::open(config)?;
    let _guard = app.guard().await?;
    with_resource!(kind, R => show_record::<R>(&app, &id, json).await)
}

async fn create_record<R: Resource>(app: &App, session: SessionContext, doc: Value) -> Result<()> {
    let record: R = serde_json::from_value(doc)?;
    let mut form = FormController::open(app.repo::<R>(), Arc::clone(&app.notifier), session, None).await;
    *form.draft_mut() = record;

    let route = form.submit().await.ok_or(CamaraError::Aborted)?;
    if let Some(id) = form.saved_id() {
        println!("  id: {}", id);
    }
    println!("  -> {}", route);
    Ok(())
}

pub async fn handle_create(
    config: &AppConfig,
    resource: String,
    file: Option<PathBuf>,
    stdin: bool,
) -> Result<()> {
    let kind = parse_kind(&resource)?;
    if kind.create_segment().is_none() {
        return Err(read_only(kind));
    }
    let doc = read_document(file, stdin)?;
    let app = App::open(config)?;
    let guard = app.guard().await?;
    let session = guard.context().clone();
    with_resource!(kind, R => create_record::<R>(&app, session, doc).await)
}

async fn update_record<R: Resource>(
    app: &App,
    session: SessionContext,
    raw_id: &str,
    sets: &[(String, String)],
) -> Result<()> {
    let id = resolve_id::<R>(app, raw_id).await?;
    let mut form =
        FormController::open(app.repo::<R>(), Arc::clone(&app.notifier), session, Some(id)).await;
    if !form.is_loaded() {
        return Err(CamaraError::Aborted);
    }

    let mut doc = serde_json::to_value(form.draft())?;
    let columns = doc
        .as_object_mut()
        .ok_or_else(|| CamaraError::InvalidResource(R::TABLE.to_string()))?;
    for (column, raw) in sets {
        if !columns.contains_key(column) {
            return Err(CamaraError::InvalidValue {
                field: column.clone(),
                message: format!("unknown column for {}", R::KIND),
            });
        }
        let value = coerce(columns.get(column), raw);
        columns.insert(column.clone(), value);
    }
    *form.draft_mut() = serde_json::from_value(doc)?;

    form.submit().await.ok_or(CamaraError::Aborted)?;
    Ok(())
}

pub async fn handle_update(
    config: &AppConfig,
    resource: String,
    id: String,
    sets: Vec<String>,
) -> Result<()> {
    let kind = parse_kind(&resource)?;
    if kind.is_read_only() {
        return Err(read_only(kind));
    }
    let sets = sets
        .iter()
        .map(|s| parse_assignment(s))
        .collect::<Result<Vec<_>>>()?;
    let app = App::open(config)?;
    let guard = app.guard().await?;
    let session = guard.context().clone();
    with_resource!(kind, R => update_record::<R>(&app, session, &id, &sets).await)
}

async fn toggle_record<R: Toggle>(app: &App, raw_id: &str, value: bool) -> Result<()> {
    let id = resolve_id::<R>(app, raw_id).await?;
    let mut view = ListView::new(app.repo::<R>(), Arc::clone(&app.notifier));
    if !view.load().await {
        return Err(CamaraError::Aborted);
    }
    if view.item(id).is_none() {
        return Err(CamaraError::not_found(R::KIND.singular(), id));
    }

    if view.toggle(id, value).await {
        Ok(())
    } else {
        Err(CamaraError::Aborted)
    }
}

async fn set_term_active(app: &App, raw_id: &str, value: bool) -> Result<()> {
    let id = resolve_id::<LegislativeTerm>(app, raw_id).await?;
    let mut view = ListView::new(app.repo::<LegislativeTerm>(), Arc::clone(&app.notifier));
    if !view.load().await {
        return Err(CamaraError::Aborted);
    }
    if view.item(id).is_none() {
        return Err(CamaraError::not_found(ResourceKind::Terms.singular(), id));
    }

    if !view.set_active(id, value).await {
        return Err(CamaraError::Aborted);
    }
    for term in view.items() {
        let marker = if term.active { "*" } else { " " };
        println!("  {} {}", marker, term.display_name());
    }
    Ok(())
}

pub async fn handle_toggle(config: &AppConfig, resource: String, id: String, off: bool) -> Result<()> {
    let kind = parse_kind(&resource)?;
    let app = App::open(config)?;
    let _guard = app.guard().await?;

    // Terms go through the exclusivity rule.
    if kind == ResourceKind::Terms {
        return set_term_active(&app, &id, !off).await;
    }
    with_toggle!(kind, R => toggle_record::<R>(&app, &id, !off).await)
}

pub async fn handle_activate_term(config: &AppConfig, id: String, off: bool) -> Result<()> {
    let app = App::open(config)?;
    let _guard = app.guard().await?;
    set_term_active(&app, &id, !off).await
}

async fn delete_record<R: Deletable>(app: &App, raw_id: &str, force: bool) -> Result<()> {
    let id = resolve_id::<R>(app, raw_id).await?;
    let mut view = ListView::new(app.repo::<R>(), Arc::clone(&app.notifier));
    if !view.load().await {
        return Err(CamaraError::Aborted);
    }
    let title = view
        .item(id)
        .map(|r| r.title())
        .ok_or_else(|| CamaraError::not_found(R::KIND.singular(), id))?;

    eprintln!("{} ({}) - {}", capitalize(R::KIND.singular()), short_id(&id), title);
    let confirm = ConsoleConfirm {
        force,
        declined: Cell::new(false),
    };
    if view.delete(id, &confirm).await {
        return Ok(());
    }
    if confirm.declined.get() {
        println!("Cancelled.");
        return Ok(());
    }
    Err(CamaraError::Aborted)
}

pub async fn handle_delete(config: &AppConfig, resource: String, id: String, force: bool) -> Result<()> {
    let kind = parse_kind(&resource)?;
    if !force && !atty::is(atty::Stream::Stdin) {
        return Err(CamaraError::InvalidValue {
            field: "force".into(),
            message: "use --force to delete in non-interactive mode".into(),
        });
    }
    let app = App::open(config)?;
    let _guard = app.guard().await?;
    with_deletable!(kind, R => delete_record::<R>(&app, &id, force).await)
}

pub async fn handle_respond(config: &AppConfig, id: String, text: String) -> Result<()> {
    let app = App::open(config)?;
    let guard = app.guard().await?;
    let id = resolve_id::<OmbudsmanMessage>(&app, &id).await?;
    let repo = app.repo::<OmbudsmanMessage>();

    match rules::respond(&repo, id, &text, guard.context()).await {
        Ok(()) => {
            app.notifier.notify(Notification::success(
                "Resposta enviada",
                "A mensagem foi marcada como respondida.",
            ));
            Ok(())
        }
        Err(e) => {
            app.notifier
                .notify(Notification::error("Erro ao enviar resposta", &e));
            Err(CamaraError::Aborted)
        }
    }
}

pub async fn handle_responses(config: &AppConfig, form: String, json: bool) -> Result<()> {
    let app = App::open(config)?;
    let _guard = app.guard().await?;
    let form_id = resolve_id::<DynamicForm>(&app, &form).await?;
    let form = app.repo::<DynamicForm>().get(form_id).await?;

    let mut view =
        ListView::for_form(app.repo::<FormResponse>(), Arc::clone(&app.notifier), form_id);
    if !view.load().await {
        return Err(CamaraError::Aborted);
    }
    debug!(form = %form_id, count = view.items().len(), "Form responses loaded");

    if json {
        println!("{}", serde_json::to_string_pretty(view.items())?);
        return Ok(());
    }
    if view.items().is_empty() {
        println!("No responses for \"{}\".", form.title());
        return Ok(());
    }
    println!(
        "{} ({} {})\n",
        form.title(),
        view.items().len(),
        ResourceKind::FormResponses.plural()
    );
    for response in view.items() {
        let id = response.id().map(|id| short_id(&id)).unwrap_or_default();
        println!("  ({}) {}", id, response.title());
        for (label, answer) in response.labelled(&form) {
            println!("      {}: {}", label, answer);
        }
    }
    Ok(())
}

pub async fn handle_dashboard(config: &AppConfig, json: bool) -> Result<()> {
    let app = App::open(config)?;
    let _guard = app.guard().await?;
    let summary = Dashboard::new(Arc::clone(&app.gateway)).load().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Vereadores:   {}", summary.council_members);
        println!("Notícias:     {}", summary.news);
        println!("Proposições:  {}", summary.propositions);
        println!("Ouvidoria:    {}", summary.ombudsman);
    }
    Ok(())
}

pub fn handle_route(path: String) -> Result<()> {
    let route = Route::parse(&path);
    debug!(%path, ?route, "Resolved route");
    println!("{:?}", route);
    println!("  path:  {}", route.path());
    println!("  admin: {}", yes_no(route.is_admin()));
    Ok(())
}

pub fn handle_slug(title: String) -> Result<()> {
    println!("{}", slugify(&title));
    Ok(())
}
