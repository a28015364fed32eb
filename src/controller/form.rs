use std::sync::Arc;

use tracing::{debug, warn};

use super::{fetch_error_title, save_error_title, saved_message, saved_title, Notifier};
use crate::entity::RecordId;
use crate::error::{CamaraError, Notification};
use crate::resource::{Repository, Resource};
use crate::routes::Route;
use crate::session::SessionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(RecordId),
}

/// Create and edit flows for one record. Edits touch only the draft;
/// nothing reaches the backend until [`FormController::submit`].
pub struct FormController<R: Resource> {
    repo: Repository<R>,
    notifier: Arc<dyn Notifier>,
    session: SessionContext,
    mode: FormMode,
    draft: R,
    loaded: bool,
    saved_id: Option<RecordId>,
}

impl<R: Resource> FormController<R> {
    /// Open in edit mode when `id` is given. A failed fetch is reported
    /// and the draft stays at its defaults.
    pub async fn open(
        repo: Repository<R>,
        notifier: Arc<dyn Notifier>,
        session: SessionContext,
        id: Option<RecordId>,
    ) -> Self {
        let mut form = Self {
            repo,
            notifier,
            session,
            mode: id.map(FormMode::Edit).unwrap_or(FormMode::Create),
            draft: R::default(),
            loaded: id.is_none(),
            saved_id: None,
        };

        if let Some(id) = id {
            match form.repo.get(id).await {
                Ok(record) => {
                    form.draft = record;
                    form.loaded = true;
                }
                Err(e) => {
                    warn!(table = R::TABLE, %id, error = %e, "Could not load record for editing");
                    form.notifier
                        .notify(Notification::error(fetch_error_title(R::KIND), &e));
                }
            }
        }
        form
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    /// False when editing and the record could not be fetched.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Id of the record written by the last successful submit.
    pub fn saved_id(&self) -> Option<RecordId> {
        self.saved_id
    }

    pub fn draft(&self) -> &R {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut R {
        &mut self.draft
    }

    /// Apply a change to the draft.
    pub fn edit(&mut self, change: impl FnOnce(&mut R)) {
        change(&mut self.draft);
    }

    /// Validate, derive, then create or update. Returns where to navigate
    /// on success; on failure the draft is left untouched.
    pub async fn submit(&mut self) -> Option<Route> {
        let edit = self.is_edit();

        let missing = self.draft.missing_required();
        if !missing.is_empty() {
            debug!(table = R::TABLE, ?missing, "Submit blocked by required fields");
            let err = CamaraError::MissingFields(missing.into_iter().map(String::from).collect());
            self.notifier
                .notify(Notification::error(save_error_title(R::KIND, edit), &err));
            return None;
        }

        let mut record = self.draft.clone();
        record.prepare();

        let result = match self.mode {
            FormMode::Create => self
                .repo
                .create(&record, &self.session)
                .await
                .map(|created| created.id()),
            FormMode::Edit(id) => self.repo.save(id, &record, &self.session).await.map(|_| Some(id)),
        };

        match result {
            Ok(saved_id) => {
                self.saved_id = saved_id;
                self.notifier.notify(Notification::success(
                    saved_title(R::KIND, edit),
                    saved_message(R::KIND, edit),
                ));
                Some(Route::AdminList(R::KIND))
            }
            Err(e) => {
                warn!(table = R::TABLE, error = %e, "Submit failed");
                self.notifier
                    .notify(Notification::error(save_error_title(R::KIND, edit), &e));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::NotificationLog;
    use crate::entity::{DynamicForm, News, TransparencyDocument};
    use crate::gateway::{AuthUser, Gateway, GatewayCall, InMemoryGateway};
    use crate::resource::ResourceKind;
    use serde_json::json;
    use uuid::Uuid;

    fn editor() -> SessionContext {
        SessionContext::new(AuthUser {
            id: Uuid::new_v4(),
            email: "editor@camara.leg.br".into(),
            name: None,
        })
    }

    fn repo<R: Resource>(gateway: &Arc<InMemoryGateway>) -> Repository<R> {
        let gateway: Arc<dyn Gateway> = gateway.clone();
        Repository::new(gateway)
    }

    #[tokio::test]
    async fn test_edit_missing_record_keeps_defaults() {
        let gateway = Arc::new(InMemoryGateway::new());
        let log = Arc::new(NotificationLog::new());
        let form: FormController<News> =
            FormController::open(repo(&gateway), log.clone(), editor(), Some(Uuid::new_v4())).await;

        assert!(form.is_edit());
        assert!(!form.is_loaded());
        assert_eq!(form.draft(), &News::default());
        let n = log.last().unwrap();
        assert!(n.is_error());
        assert_eq!(n.title, "Erro ao carregar notícia");
    }

    #[tokio::test]
    async fn test_create_with_blank_required_issues_no_call() {
        let gateway = Arc::new(InMemoryGateway::new());
        let log = Arc::new(NotificationLog::new());
        let mut form: FormController<News> =
            FormController::open(repo(&gateway), log.clone(), editor(), None).await;
        form.edit(|n| n.content.title = "Só título".into());

        assert_eq!(form.submit().await, None);
        assert!(gateway.mutation_calls().is_empty());
        assert!(log.last().unwrap().message.contains("conteudo"));
    }

    #[tokio::test]
    async fn test_create_derives_slug_and_author() {
        let gateway = Arc::new(InMemoryGateway::new());
        let log = Arc::new(NotificationLog::new());
        let session = editor();
        let author = session.current().unwrap().id;
        let mut form: FormController<News> =
            FormController::open(repo(&gateway), log.clone(), session, None).await;
        form.edit(|n| {
            n.content.title = "Área de Lazer nº 2".into();
            n.content.body = "Inaugurada".into();
        });

        assert_eq!(form.submit().await, Some(Route::AdminList(ResourceKind::News)));
        let rows = gateway.rows("noticias");
        assert_eq!(
            form.saved_id().map(|id| id.to_string()),
            rows[0]["id"].as_str().map(String::from)
        );
        assert_eq!(rows[0]["slug"], json!("area-de-lazer-n-2"));
        assert_eq!(rows[0]["autor_id"], json!(author.to_string()));
        assert_eq!(log.last().unwrap().title, "Notícia criada");
        // The draft itself is not rewritten.
        assert!(form.draft().content.slug.is_empty());
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_draft() {
        let gateway = Arc::new(InMemoryGateway::new());
        let log = Arc::new(NotificationLog::new());
        let row = gateway.seed("formularios", json!({"nome": "Contato", "campos": []}));
        let id: Uuid = row["id"].as_str().unwrap().parse().unwrap();
        let mut form: FormController<DynamicForm> =
            FormController::open(repo(&gateway), log.clone(), editor(), Some(id)).await;
        let field = form.draft_mut().add_field();
        form.edit(|f| f.field_mut(&field).unwrap().label = "Nome".into());

        gateway.fail_next("timeout");
        assert_eq!(form.submit().await, None);
        assert_eq!(form.draft().fields.len(), 1);
        assert_eq!(log.last().unwrap().title, "Erro ao atualizar formulário");

        assert_eq!(form.submit().await, Some(Route::AdminList(ResourceKind::Forms)));
        let saved = gateway.rows("formularios");
        assert_eq!(saved[0]["campos"][0]["label"], json!("Nome"));
        match gateway.mutation_calls().last().unwrap() {
            GatewayCall::Update { patch, .. } => assert!(!patch.contains_key("id")),
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_authored_submit_without_session() {
        let gateway = Arc::new(InMemoryGateway::new());
        let log = Arc::new(NotificationLog::new());
        let mut form: FormController<TransparencyDocument> =
            FormController::open(repo(&gateway), log.clone(), SessionContext::anonymous(), None)
                .await;
        form.edit(|d| {
            d.title = "Balancete".into();
            d.category = "Financeiro".into();
            d.file_type = "pdf".into();
            d.file_url = "https://example.org/b.pdf".into();
        });

        assert_eq!(form.submit().await, None);
        assert!(gateway.calls().is_empty());
        assert_eq!(log.last().unwrap().message, "Usuário não autenticado");
    }
}
