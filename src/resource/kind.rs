use serde::Serialize;

/// Every manageable area of the admin back office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    News,
    Pages,
    Propositions,
    CouncilMembers,
    BoardMembers,
    Terms,
    Transparency,
    Symbols,
    Ombudsman,
    Forms,
    Agenda,
    Users,
    Settings,
    /// Submissions of one form; reached from the form list, not the menu.
    FormResponses,
}

const ALL: [ResourceKind; 13] = [
    ResourceKind::News,
    ResourceKind::Pages,
    ResourceKind::Propositions,
    ResourceKind::CouncilMembers,
    ResourceKind::BoardMembers,
    ResourceKind::Terms,
    ResourceKind::Transparency,
    ResourceKind::Symbols,
    ResourceKind::Ombudsman,
    ResourceKind::Forms,
    ResourceKind::Agenda,
    ResourceKind::Users,
    ResourceKind::Settings,
];

impl ResourceKind {
    pub fn all() -> &'static [ResourceKind] {
        &ALL
    }

    /// Path segment under `/admin`.
    pub fn slug(&self) -> &'static str {
        match self {
            ResourceKind::News => "noticias",
            ResourceKind::Pages => "paginas",
            ResourceKind::Propositions => "proposicoes",
            ResourceKind::CouncilMembers => "vereadores",
            ResourceKind::BoardMembers => "mesa-diretora",
            ResourceKind::Terms => "legislaturas",
            ResourceKind::Transparency => "transparencia",
            ResourceKind::Symbols => "simbolos",
            ResourceKind::Ombudsman => "ouvidoria",
            ResourceKind::Forms => "formularios",
            ResourceKind::Agenda => "agenda",
            ResourceKind::Users => "usuarios",
            ResourceKind::Settings => "configuracoes",
            ResourceKind::FormResponses => "respostas",
        }
    }

    pub fn singular(&self) -> &'static str {
        match self {
            ResourceKind::News => "notícia",
            ResourceKind::Pages => "página",
            ResourceKind::Propositions => "proposição",
            ResourceKind::CouncilMembers => "vereador",
            ResourceKind::BoardMembers => "membro da mesa",
            ResourceKind::Terms => "legislatura",
            ResourceKind::Transparency => "documento",
            ResourceKind::Symbols => "símbolo",
            ResourceKind::Ombudsman => "mensagem",
            ResourceKind::Forms => "formulário",
            ResourceKind::Agenda => "evento",
            ResourceKind::Users => "usuário",
            ResourceKind::Settings => "configuração",
            ResourceKind::FormResponses => "resposta",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::News => "notícias",
            ResourceKind::Pages => "páginas",
            ResourceKind::Propositions => "proposições",
            ResourceKind::CouncilMembers => "vereadores",
            ResourceKind::BoardMembers => "membros da mesa",
            ResourceKind::Terms => "legislaturas",
            ResourceKind::Transparency => "documentos",
            ResourceKind::Symbols => "símbolos",
            ResourceKind::Ombudsman => "mensagens",
            ResourceKind::Forms => "formulários",
            ResourceKind::Agenda => "eventos",
            ResourceKind::Users => "usuários",
            ResourceKind::Settings => "configurações",
            ResourceKind::FormResponses => "respostas",
        }
    }

    /// Grammatical gender of the singular noun.
    pub fn feminine(&self) -> bool {
        matches!(
            self,
            ResourceKind::News
                | ResourceKind::Pages
                | ResourceKind::Propositions
                | ResourceKind::Terms
                | ResourceKind::Ombudsman
                | ResourceKind::Settings
                | ResourceKind::FormResponses
        )
    }

    /// Segment of the create route, or `None` when the admin area has no
    /// create screen.
    pub fn create_segment(&self) -> Option<&'static str> {
        match self {
            ResourceKind::Ombudsman | ResourceKind::Settings | ResourceKind::FormResponses => None,
            k if k.feminine() => Some("nova"),
            _ => Some("novo"),
        }
    }

    /// Whether records of this kind live in a table.
    pub fn is_table_backed(&self) -> bool {
        !matches!(self, ResourceKind::Settings)
    }

    /// Nothing here is created or edited from the admin area.
    pub fn is_read_only(&self) -> bool {
        matches!(self, ResourceKind::Settings | ResourceKind::FormResponses)
    }

    /// The resource a nested one is listed under.
    pub fn parent(&self) -> Option<ResourceKind> {
        match self {
            ResourceKind::FormResponses => Some(ResourceKind::Forms),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('_', "-");
        if let Some(kind) = ALL.iter().find(|k| k.slug() == key) {
            return Ok(*kind);
        }
        match key.as_str() {
            "news" => Ok(ResourceKind::News),
            "pages" => Ok(ResourceKind::Pages),
            "propositions" => Ok(ResourceKind::Propositions),
            "members" | "council-members" => Ok(ResourceKind::CouncilMembers),
            "board" | "board-members" => Ok(ResourceKind::BoardMembers),
            "terms" => Ok(ResourceKind::Terms),
            "symbols" => Ok(ResourceKind::Symbols),
            "ombudsman" => Ok(ResourceKind::Ombudsman),
            "forms" => Ok(ResourceKind::Forms),
            "events" => Ok(ResourceKind::Agenda),
            "users" => Ok(ResourceKind::Users),
            "settings" => Ok(ResourceKind::Settings),
            "respostas" | "responses" | "form-responses" => Ok(ResourceKind::FormResponses),
            _ => Err(format!("Unknown resource: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_segment_follows_gender() {
        assert_eq!(ResourceKind::News.create_segment(), Some("nova"));
        assert_eq!(ResourceKind::Terms.create_segment(), Some("nova"));
        assert_eq!(ResourceKind::CouncilMembers.create_segment(), Some("novo"));
        assert_eq!(ResourceKind::Agenda.create_segment(), Some("novo"));
        assert_eq!(ResourceKind::Ombudsman.create_segment(), None);
        assert_eq!(ResourceKind::FormResponses.create_segment(), None);
    }

    #[test]
    fn test_form_responses_nest_under_forms() {
        assert!(!ResourceKind::all().contains(&ResourceKind::FormResponses));
        assert_eq!(ResourceKind::FormResponses.parent(), Some(ResourceKind::Forms));
        assert!(ResourceKind::FormResponses.is_read_only());
        assert!(!ResourceKind::Forms.is_read_only());
    }

    #[test]
    fn test_parse_slug_and_english() {
        assert_eq!("mesa-diretora".parse::<ResourceKind>().unwrap(), ResourceKind::BoardMembers);
        assert_eq!("mesa_diretora".parse::<ResourceKind>().unwrap(), ResourceKind::BoardMembers);
        assert_eq!("events".parse::<ResourceKind>().unwrap(), ResourceKind::Agenda);
        assert!("widgets".parse::<ResourceKind>().is_err());
        assert_eq!("respostas".parse::<ResourceKind>().unwrap(), ResourceKind::FormResponses);
        for kind in ResourceKind::all() {
            assert_eq!(kind.slug().parse::<ResourceKind>().unwrap(), *kind);
        }
    }
}
