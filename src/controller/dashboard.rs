use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::entity::{CouncilMember, News, OmbudsmanMessage, Proposition};
use crate::gateway::Gateway;
use crate::resource::Resource;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub council_members: u64,
    pub news: u64,
    pub propositions: u64,
    pub ombudsman: u64,
}

/// Admin landing page counts.
pub struct Dashboard {
    gateway: Arc<dyn Gateway>,
}

impl Dashboard {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// Run the four counts together. If any fails, every count is zero.
    pub async fn load(&self) -> DashboardSummary {
        let gw = &self.gateway;
        let (members, news, propositions, ombudsman) = tokio::join!(
            gw.count(CouncilMember::TABLE, &[]),
            gw.count(News::TABLE, &[]),
            gw.count(Proposition::TABLE, &[]),
            gw.count(OmbudsmanMessage::TABLE, &[]),
        );

        match (members, news, propositions, ombudsman) {
            (Ok(council_members), Ok(news), Ok(propositions), Ok(ombudsman)) => DashboardSummary {
                council_members,
                news,
                propositions,
                ombudsman,
            },
            (members, news, propositions, ombudsman) => {
                for err in [members.err(), news.err(), propositions.err(), ombudsman.err()]
                    .into_iter()
                    .flatten()
                {
                    warn!(error = %err, "Erro ao carregar estatísticas");
                }
                DashboardSummary::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::InMemoryGateway;
    use serde_json::json;

    fn seeded() -> Arc<InMemoryGateway> {
        let gateway = Arc::new(InMemoryGateway::new());
        for i in 0..5 {
            gateway.seed("vereadores", json!({"nome": format!("V{}", i)}));
        }
        for i in 0..12 {
            gateway.seed("noticias", json!({"titulo": format!("N{}", i)}));
        }
        for i in 0..3 {
            gateway.seed("proposicoes", json!({"numero": i.to_string()}));
        }
        gateway
    }

    #[tokio::test]
    async fn test_counts() {
        let gateway = seeded();
        let summary = Dashboard::new(gateway.clone()).load().await;
        assert_eq!(
            summary,
            DashboardSummary {
                council_members: 5,
                news: 12,
                propositions: 3,
                ombudsman: 0,
            }
        );
        assert_eq!(gateway.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_one_failure_zeroes_everything() {
        let gateway = seeded();
        gateway.fail_table("proposicoes", "permission denied");
        let summary = Dashboard::new(gateway).load().await;
        assert_eq!(summary, DashboardSummary::default());
    }
}
