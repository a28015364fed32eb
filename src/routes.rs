//! Path-based navigation targets.

use uuid::Uuid;

use crate::resource::ResourceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    CouncilMembers,
    Login,
    AdminDashboard,
    AdminList(ResourceKind),
    AdminNew(ResourceKind),
    AdminEdit(ResourceKind, Uuid),
    /// Ombudsman message detail.
    AdminShow(ResourceKind, Uuid),
    /// Ombudsman reply screen.
    AdminRespond(Uuid),
    /// Submissions received by one dynamic form.
    AdminFormResponses(Uuid),
    NotFound,
}

impl Route {
    /// Resolve a path. Anything unmatched is [`Route::NotFound`].
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["vereadores"] => Route::CouncilMembers,
            ["login"] => Route::Login,
            ["admin"] => Route::AdminDashboard,
            ["admin", rest @ ..] => parse_admin(rest),
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::CouncilMembers => "/vereadores".to_string(),
            Route::Login => "/login".to_string(),
            Route::AdminDashboard => "/admin".to_string(),
            Route::AdminList(kind) => format!("/admin/{}", kind.slug()),
            Route::AdminNew(kind) => format!(
                "/admin/{}/{}",
                kind.slug(),
                kind.create_segment().unwrap_or("novo")
            ),
            Route::AdminEdit(kind, id) => format!("/admin/{}/{}/editar", kind.slug(), id),
            Route::AdminShow(kind, id) => format!("/admin/{}/{}", kind.slug(), id),
            Route::AdminRespond(id) => format!("/admin/ouvidoria/{}/responder", id),
            Route::AdminFormResponses(id) => format!("/admin/formularios/{}/respostas", id),
            Route::NotFound => "/404".to_string(),
        }
    }

    pub fn is_admin(&self) -> bool {
        !matches!(
            self,
            Route::Home | Route::CouncilMembers | Route::Login | Route::NotFound
        )
    }
}

fn parse_admin(segments: &[&str]) -> Route {
    let Some((first, rest)) = segments.split_first() else {
        return Route::AdminDashboard;
    };
    let Ok(kind) = first.parse::<ResourceKind>() else {
        return Route::NotFound;
    };
    // Only canonical slugs route; English aliases are for the CLI.
    // Nested kinds only route under their parent record.
    if kind.slug() != *first || kind.parent().is_some() {
        return Route::NotFound;
    }

    match rest {
        [] => Route::AdminList(kind),
        ["novo" | "nova"] if kind.create_segment().is_some() => Route::AdminNew(kind),
        [id, "respostas"] if kind == ResourceKind::Forms => match id.parse() {
            Ok(id) => Route::AdminFormResponses(id),
            Err(_) => Route::NotFound,
        },
        [id, "editar"] if kind != ResourceKind::Ombudsman => match id.parse() {
            Ok(id) if kind.is_table_backed() => Route::AdminEdit(kind, id),
            _ => Route::NotFound,
        },
        [id] if kind == ResourceKind::Ombudsman => match id.parse() {
            Ok(id) => Route::AdminShow(kind, id),
            Err(_) => Route::NotFound,
        },
        [id, "responder"] if kind == ResourceKind::Ombudsman => match id.parse() {
            Ok(id) => Route::AdminRespond(id),
            Err(_) => Route::NotFound,
        },
        _ => Route::NotFound,
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_routes() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse("/vereadores"), Route::CouncilMembers);
        assert_eq!(Route::parse("/login?next=/admin"), Route::Login);
        assert_eq!(Route::parse("/nada/aqui"), Route::NotFound);
    }

    #[test]
    fn test_admin_routes() {
        let id = Uuid::new_v4();
        assert_eq!(Route::parse("/admin"), Route::AdminDashboard);
        assert_eq!(Route::parse("/admin/noticias"), Route::AdminList(ResourceKind::News));
        assert_eq!(Route::parse("/admin/noticias/nova"), Route::AdminNew(ResourceKind::News));
        assert_eq!(Route::parse("/admin/noticias/novo"), Route::AdminNew(ResourceKind::News));
        assert_eq!(
            Route::parse(&format!("/admin/mesa-diretora/{}/editar", id)),
            Route::AdminEdit(ResourceKind::BoardMembers, id)
        );
        assert_eq!(
            Route::parse(&format!("/admin/ouvidoria/{}/responder", id)),
            Route::AdminRespond(id)
        );
        assert_eq!(Route::parse("/admin/ouvidoria/nova"), Route::NotFound);
        assert_eq!(Route::parse("/admin/noticias/abc/editar"), Route::NotFound);
        assert_eq!(Route::parse("/admin/news"), Route::NotFound);
    }

    #[test]
    fn test_form_response_routes() {
        let id = Uuid::new_v4();
        let route = Route::parse(&format!("/admin/formularios/{}/respostas", id));
        assert_eq!(route, Route::AdminFormResponses(id));
        assert!(route.is_admin());
        assert_eq!(route.path(), format!("/admin/formularios/{}/respostas", id));

        assert_eq!(Route::parse("/admin/respostas"), Route::NotFound);
        assert_eq!(Route::parse("/admin/formularios/abc/respostas"), Route::NotFound);
        assert_eq!(
            Route::parse(&format!("/admin/noticias/{}/respostas", id)),
            Route::NotFound
        );
    }

    #[test]
    fn test_path_round_trip() {
        let id = Uuid::new_v4();
        for route in [
            Route::Home,
            Route::AdminList(ResourceKind::Terms),
            Route::AdminNew(ResourceKind::Terms),
            Route::AdminNew(ResourceKind::Symbols),
            Route::AdminEdit(ResourceKind::Agenda, id),
            Route::AdminShow(ResourceKind::Ombudsman, id),
            Route::AdminRespond(id),
            Route::AdminFormResponses(id),
        ] {
            assert_eq!(Route::parse(&route.path()), route);
        }
        assert_eq!(Route::AdminNew(ResourceKind::Symbols).path(), "/admin/simbolos/novo");
        assert!(!Route::Login.is_admin());
    }
}
