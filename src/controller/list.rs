use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{
    delete_error_title, delete_prompt, deleted_title, load_error_title, status_error_title, Confirm,
    Notifier,
};
use crate::entity::{FormResponse, RecordId};
use crate::error::Notification;
use crate::gateway::{Filter, Order};
use crate::resource::{Deletable, Repository, Resource, Toggle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Empty,
    Populated,
}

/// A loaded collection plus its row-level actions.
pub struct ListView<R: Resource> {
    repo: Repository<R>,
    notifier: Arc<dyn Notifier>,
    order: Vec<Order>,
    filters: Vec<Filter>,
    items: Vec<R>,
    loading: bool,
}

impl<R: Resource> ListView<R> {
    pub fn new(repo: Repository<R>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            repo,
            notifier,
            order: R::default_order(),
            filters: Vec::new(),
            items: Vec::new(),
            loading: true,
        }
    }

    pub fn with_order(mut self, order: Vec<Order>) -> Self {
        self.order = order;
        self
    }

    pub fn with_filters(mut self, filters: Vec<Filter>) -> Self {
        self.filters = filters;
        self
    }

    pub fn state(&self) -> ViewState {
        if self.loading {
            ViewState::Loading
        } else if self.items.is_empty() {
            ViewState::Empty
        } else {
            ViewState::Populated
        }
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn item(&self, id: RecordId) -> Option<&R> {
        self.items.iter().find(|r| r.id() == Some(id))
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<R> {
        &mut self.items
    }

    pub fn repository(&self) -> &Repository<R> {
        &self.repo
    }

    pub(crate) fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }

    /// Fetch the whole collection. On failure the previous rows stay.
    pub async fn load(&mut self) -> bool {
        self.loading = true;
        let result = self.repo.list(&self.order, &self.filters).await;
        self.loading = false;

        match result {
            Ok(items) => {
                info!(table = R::TABLE, count = items.len(), "List loaded");
                self.items = items;
                true
            }
            Err(e) => {
                warn!(table = R::TABLE, error = %e, "List load failed");
                self.notify(Notification::error(load_error_title(R::KIND), &e));
                false
            }
        }
    }
}

impl ListView<FormResponse> {
    /// Submissions of one form, newest first.
    pub fn for_form(
        repo: Repository<FormResponse>,
        notifier: Arc<dyn Notifier>,
        form_id: RecordId,
    ) -> Self {
        Self::new(repo, notifier)
            .with_filters(vec![Filter::eq("formulario_id", form_id.to_string())])
    }
}

impl<R: Toggle> ListView<R> {
    /// Switch a row's flag. The row shows the new value before the
    /// backend answers and keeps it even if the write fails.
    pub async fn toggle(&mut self, id: RecordId, value: bool) -> bool {
        if let Some(item) = self.items.iter_mut().find(|r| r.id() == Some(id)) {
            item.set_flag(value);
        }

        match self.repo.update(id, R::flag_patch(value)).await {
            Ok(()) => {
                self.notify(Notification::success(
                    R::flag_message(value),
                    format!("Status de \"{}\" atualizado.", self.title_of(id)),
                ));
                true
            }
            Err(e) => {
                warn!(table = R::TABLE, %id, error = %e, "Toggle failed, local row left as patched");
                self.notify(Notification::error(status_error_title(R::KIND), &e));
                false
            }
        }
    }

    fn title_of(&self, id: RecordId) -> String {
        self.item(id).map(|r| r.title()).unwrap_or_else(|| id.to_string())
    }
}

impl<R: Deletable> ListView<R> {
    /// Delete after confirmation. Declining issues no call.
    pub async fn delete(&mut self, id: RecordId, confirm: &dyn Confirm) -> bool {
        if !confirm.confirm(&delete_prompt(R::KIND)) {
            debug!(table = R::TABLE, %id, "Delete declined");
            return false;
        }

        match self.repo.delete(id).await {
            Ok(()) => {
                self.items.retain(|r| r.id() != Some(id));
                self.notify(Notification::success(
                    deleted_title(R::KIND),
                    "Registro removido com sucesso.",
                ));
                true
            }
            Err(e) => {
                self.notify(Notification::error(delete_error_title(R::KIND), &e));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::NotificationLog;
    use crate::entity::{CouncilMember, News, OfficialSymbol};
    use crate::entity::Answer;
    use crate::gateway::{Gateway, GatewayCall, InMemoryGateway};
    use serde_json::json;
    use uuid::Uuid;

    fn view<R: Resource>(gateway: &Arc<InMemoryGateway>, log: &Arc<NotificationLog>) -> ListView<R> {
        let gateway: Arc<dyn Gateway> = gateway.clone();
        ListView::new(Repository::new(gateway), log.clone())
    }

    fn id_of(row: &crate::gateway::Row) -> Uuid {
        row["id"].as_str().unwrap().parse().unwrap()
    }

    #[tokio::test]
    async fn test_states() {
        let gateway = Arc::new(InMemoryGateway::new());
        let log = Arc::new(NotificationLog::new());
        let mut list: ListView<OfficialSymbol> = view(&gateway, &log);
        assert_eq!(list.state(), ViewState::Loading);

        assert!(list.load().await);
        assert_eq!(list.state(), ViewState::Empty);

        gateway.seed("simbolos_oficiais", json!({"titulo": "Bandeira", "tipo": "bandeira"}));
        list.load().await;
        assert_eq!(list.state(), ViewState::Populated);
    }

    #[tokio::test]
    async fn test_load_failure_notifies() {
        let gateway = Arc::new(InMemoryGateway::new());
        let log = Arc::new(NotificationLog::new());
        let mut list: ListView<News> = view(&gateway, &log);
        gateway.fail_next("permission denied");

        assert!(!list.load().await);
        assert_eq!(list.state(), ViewState::Empty);
        let err = log.last().unwrap();
        assert!(err.is_error());
        assert_eq!(err.title, "Erro ao carregar notícias");
        assert_eq!(err.message, "permission denied");
    }

    #[tokio::test]
    async fn test_toggle_is_optimistic_without_rollback() {
        let gateway = Arc::new(InMemoryGateway::new());
        let log = Arc::new(NotificationLog::new());
        let row = gateway.seed("vereadores", json!({"nome": "Ana", "partido": "A", "ativo": true}));
        let id = id_of(&row);
        let mut list: ListView<CouncilMember> = view(&gateway, &log);
        list.load().await;

        gateway.fail_next("network down");
        assert!(!list.toggle(id, false).await);

        // Row keeps the patched value; the backend still has the old one.
        assert!(!list.item(id).unwrap().active);
        assert_eq!(gateway.rows("vereadores")[0]["ativo"], json!(true));
        assert_eq!(log.last().unwrap().title, "Erro ao alterar status do vereador");
    }

    #[tokio::test]
    async fn test_toggle_success_writes_patch() {
        let gateway = Arc::new(InMemoryGateway::new());
        let log = Arc::new(NotificationLog::new());
        let row = gateway.seed("noticias", json!({"titulo": "A", "conteudo": "x", "status": "draft"}));
        let id = id_of(&row);
        let mut list: ListView<News> = view(&gateway, &log);
        list.load().await;

        assert!(list.toggle(id, true).await);
        assert!(list.item(id).unwrap().content.is_published());
        assert_eq!(gateway.rows("noticias")[0]["status"], json!("published"));
        assert_eq!(log.last().unwrap().title, "Notícia publicada");
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let gateway = Arc::new(InMemoryGateway::new());
        let log = Arc::new(NotificationLog::new());
        let a = gateway.seed("vereadores", json!({"nome": "Ana", "partido": "A"}));
        gateway.seed("vereadores", json!({"nome": "Bia", "partido": "B"}));
        let mut list: ListView<CouncilMember> = view(&gateway, &log);
        list.load().await;
        gateway.clear_calls();

        assert!(!list.delete(id_of(&a), &false).await);
        assert!(gateway.calls().is_empty());
        assert_eq!(list.items().len(), 2);

        assert!(list.delete(id_of(&a), &true).await);
        let deletes: Vec<_> = gateway
            .calls()
            .into_iter()
            .filter(|c| matches!(c, GatewayCall::Delete { .. }))
            .collect();
        assert_eq!(deletes.len(), 1);
        assert_eq!(list.items().len(), 1);
        assert_eq!(list.items()[0].name, "Bia");
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_row() {
        let gateway = Arc::new(InMemoryGateway::new());
        let log = Arc::new(NotificationLog::new());
        let a = gateway.seed("vereadores", json!({"nome": "Ana", "partido": "A"}));
        let mut list: ListView<CouncilMember> = view(&gateway, &log);
        list.load().await;

        gateway.fail_table("vereadores", "foreign key violation");
        assert!(!list.delete(id_of(&a), &true).await);
        assert_eq!(list.items().len(), 1);
        assert_eq!(log.last().unwrap().title, "Erro ao excluir vereador");
    }

    #[tokio::test]
    async fn test_form_responses_scoped_to_form() {
        let gateway = Arc::new(InMemoryGateway::new());
        let log = Arc::new(NotificationLog::new());
        let form = Uuid::new_v4();
        let other = Uuid::new_v4();
        gateway.seed(
            "formulario_respostas",
            json!({"formulario_id": form.to_string(), "respostas": {"nome": "Ana"}, "created_at": "2025-03-01T10:00:00Z"}),
        );
        gateway.seed(
            "formulario_respostas",
            json!({"formulario_id": other.to_string(), "respostas": {"nome": "Bia"}, "created_at": "2025-03-02T10:00:00Z"}),
        );
        gateway.seed(
            "formulario_respostas",
            json!({"formulario_id": form.to_string(), "respostas": {"nome": "Caio"}, "created_at": "2025-03-03T10:00:00Z"}),
        );

        let gw: Arc<dyn Gateway> = gateway.clone();
        let mut list = ListView::for_form(Repository::new(gw), log.clone(), form);
        assert!(list.load().await);

        let names: Vec<_> = list.items().iter().map(|r| r.answer("nome").cloned()).collect();
        assert_eq!(
            names,
            vec![Some(Answer::Text("Caio".into())), Some(Answer::Text("Ana".into()))]
        );
        assert!(log.last().is_none());
    }
}
