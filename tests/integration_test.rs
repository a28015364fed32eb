use std::path::Path;
use std::process::{Command, Output, Stdio};

use serde_json::Value;
use tempfile::TempDir;

const OPERATOR_ID: &str = "6f1c2a8e-0000-4000-8000-00000000a11c";

/// Runs in `dir` with its own database and no operator signed in.
fn camara_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_camara"));
    cmd.current_dir(dir)
        .env("CAMARA_DB", dir.join("camara.db"))
        .env_remove("CAMARA_OPERATOR_EMAIL")
        .env_remove("CAMARA_OPERATOR_ID")
        .env_remove("CAMARA_LOG")
        .env_remove("RUST_LOG");
    cmd
}

fn signed_in(dir: &Path) -> Command {
    let mut cmd = camara_cmd(dir);
    cmd.env("CAMARA_OPERATOR_EMAIL", "secretaria@camara.leg.br")
        .env("CAMARA_OPERATOR_ID", OPERATOR_ID);
    cmd
}

fn create(dir: &Path, resource: &str, doc: &str) -> Output {
    let file = dir.join(format!("{}.json", resource));
    std::fs::write(&file, doc).unwrap();
    signed_in(dir)
        .args(["create", resource, "--file"])
        .arg(&file)
        .output()
        .unwrap()
}

fn list_json(dir: &Path, resource: &str) -> Vec<Value> {
    let output = signed_in(dir)
        .args(["list", resource, "--json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_slug() {
    let tmp = TempDir::new().unwrap();

    let output = camara_cmd(tmp.path())
        .args(["slug", "Sessão Ordinária: Orçamento 2025!"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "sessao-ordinaria-orcamento-2025");
}

#[test]
fn test_route_resolution() {
    let tmp = TempDir::new().unwrap();

    let output = camara_cmd(tmp.path())
        .args(["route", "/admin/legislaturas/nova"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("AdminNew(Terms)"));
    assert!(stdout.contains("/admin/legislaturas/nova"));

    let output = camara_cmd(tmp.path())
        .args(["route", "/admin/inexistente"])
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("NotFound"));
}

#[test]
fn test_resources_json() {
    let tmp = TempDir::new().unwrap();

    let output = camara_cmd(tmp.path())
        .args(["resources", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let resources: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(resources.len(), 13);
    let ombudsman = resources
        .iter()
        .find(|r| r["resource"] == "ouvidoria")
        .unwrap();
    assert!(ombudsman["create"].is_null());
}

#[test]
fn test_admin_commands_require_session() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("vereador.json");
    std::fs::write(&file, r#"{"nome": "Ana Souza", "partido": "PV"}"#).unwrap();

    let output = camara_cmd(tmp.path())
        .args(["create", "vereadores", "--file"])
        .arg(&file)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("/login"));
    assert!(stderr.contains("Usuário não autenticado"));
}

#[test]
fn test_council_member_workflow() {
    let tmp = TempDir::new().unwrap();

    let output = create(tmp.path(), "vereadores", r#"{"nome": "Ana Souza", "partido": "PV"}"#);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Vereador criado"));
    assert!(stdout.contains("/admin/vereadores"));

    let members = list_json(tmp.path(), "vereadores");
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["nome"], "Ana Souza");
    assert_eq!(members[0]["ativo"], true);
    let id = members[0]["id"].as_str().unwrap().to_string();

    // Deactivate using a short prefix
    let output = signed_in(tmp.path())
        .args(["toggle", "vereadores", &id[..8], "--off"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Vereador desativado"));

    let output = signed_in(tmp.path())
        .args(["get", "vereadores", &id, "--json"])
        .output()
        .unwrap();
    let member: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(member["ativo"], false);

    // Update a text column
    let output = signed_in(tmp.path())
        .args(["update", "vereadores", &id, "--set", "partido=PSB"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(list_json(tmp.path(), "vereadores")[0]["partido"], "PSB");

    let output = signed_in(tmp.path())
        .args(["delete", "vereadores", &id, "--force"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(list_json(tmp.path(), "vereadores").is_empty());
}

#[test]
fn test_create_missing_required_fails() {
    let tmp = TempDir::new().unwrap();

    let output = create(tmp.path(), "vereadores", r#"{"nome": "Sem Partido"}"#);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Erro ao criar vereador"));
    assert!(stderr.contains("partido"));
    assert!(!stderr.contains("Operation aborted"));
    assert!(list_json(tmp.path(), "vereadores").is_empty());
}

#[test]
fn test_only_one_term_active() {
    let tmp = TempDir::new().unwrap();

    for doc in [
        r#"{"numero": 18, "periodo_inicio": "2021-01-01", "periodo_fim": "2024-12-31"}"#,
        r#"{"numero": 19, "periodo_inicio": "2025-01-01", "periodo_fim": "2028-12-31"}"#,
    ] {
        let output = create(tmp.path(), "legislaturas", doc);
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    }

    let terms = list_json(tmp.path(), "legislaturas");
    let id_of = |number: u64| {
        terms
            .iter()
            .find(|t| t["numero"] == number)
            .and_then(|t| t["id"].as_str())
            .unwrap()
            .to_string()
    };
    let older = id_of(18);
    let newer = id_of(19);

    let output = signed_in(tmp.path())
        .args(["activate-term", &older])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let output = signed_in(tmp.path())
        .args(["toggle", "legislaturas", &newer])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Legislatura ativada"));

    let active: Vec<u64> = list_json(tmp.path(), "legislaturas")
        .iter()
        .filter(|t| t["ativa"] == true)
        .filter_map(|t| t["numero"].as_u64())
        .collect();
    assert_eq!(active, vec![19]);
}

#[test]
fn test_respond_to_ombudsman_message() {
    let tmp = TempDir::new().unwrap();
    let id = "0b6f7c1e-5d2a-4c3b-9e8f-1a2b3c4d5e6f";

    // Messages arrive from the public portal, straight into the table.
    let conn = rusqlite::Connection::open(tmp.path().join("camara.db")).unwrap();
    conn.execute(
        "CREATE TABLE ouvidoria (id TEXT PRIMARY KEY, data TEXT NOT NULL)",
        [],
    )
    .unwrap();
    let row = serde_json::json!({
        "id": id,
        "nome": "João",
        "email": "joao@example.org",
        "assunto": "Iluminação",
        "mensagem": "Poste apagado na rua 7",
        "status": "Nova",
        "created_at": "2025-03-01T12:00:00Z",
    });
    conn.execute(
        "INSERT INTO ouvidoria (id, data) VALUES (?1, ?2)",
        rusqlite::params![id, row.to_string()],
    )
    .unwrap();
    drop(conn);

    let output = create(
        tmp.path(),
        "ouvidoria",
        r#"{"nome": "Maria", "email": "maria@example.org", "assunto": "x", "mensagem": "y"}"#,
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("read-only"));

    let output = signed_in(tmp.path())
        .args(["respond", &id[..8], "Equipe de manutenção acionada."])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let output = signed_in(tmp.path())
        .args(["get", "ouvidoria", id, "--json"])
        .output()
        .unwrap();
    let message: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(message["status"], "Respondida");
    assert_eq!(message["resposta"], "Equipe de manutenção acionada.");
    assert_eq!(message["respondido_por"], OPERATOR_ID);
}

#[test]
fn test_delete_requires_force_when_not_interactive() {
    let tmp = TempDir::new().unwrap();
    create(tmp.path(), "vereadores", r#"{"nome": "Ana Souza", "partido": "PV"}"#);
    let id = list_json(tmp.path(), "vereadores")[0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let output = signed_in(tmp.path())
        .args(["delete", "vereadores", &id])
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--force"));
    assert_eq!(list_json(tmp.path(), "vereadores").len(), 1);
}

#[test]
fn test_users_cannot_be_deleted() {
    let tmp = TempDir::new().unwrap();

    let output = signed_in(tmp.path())
        .args(["delete", "usuarios", "abc", "--force"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot be deleted"));
}

#[test]
fn test_settings_listing() {
    let tmp = TempDir::new().unwrap();

    let output = signed_in(tmp.path())
        .args(["list", "configuracoes"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Banco de Dados"));
    assert!(stdout.contains("Servidor SMTP"));
}

#[test]
fn test_dashboard_json() {
    let tmp = TempDir::new().unwrap();
    create(tmp.path(), "vereadores", r#"{"nome": "Ana Souza", "partido": "PV"}"#);
    create(tmp.path(), "vereadores", r#"{"nome": "Bruno Lima", "partido": "MDB"}"#);
    create(
        tmp.path(),
        "noticias",
        r#"{"titulo": "Sessão solene", "conteudo": "Homenagem aos servidores"}"#,
    );

    let output = signed_in(tmp.path())
        .args(["dashboard", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let summary: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["council_members"], 2);
    assert_eq!(summary["news"], 1);
    assert_eq!(summary["propositions"], 0);
    assert_eq!(summary["ombudsman"], 0);
}

#[test]
fn test_form_responses() {
    let tmp = TempDir::new().unwrap();
    let output = create(
        tmp.path(),
        "formularios",
        r#"{"nome": "Fale com o vereador", "campos": [
            {"id": "f1", "tipo": "text", "label": "Nome"},
            {"id": "f2", "tipo": "textarea", "label": "Mensagem"}
        ]}"#,
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let form_id = list_json(tmp.path(), "formularios")[0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    // Submissions arrive from the public portal.
    let conn = rusqlite::Connection::open(tmp.path().join("camara.db")).unwrap();
    conn.execute(
        "CREATE TABLE IF NOT EXISTS formulario_respostas (id TEXT PRIMARY KEY, data TEXT NOT NULL)",
        [],
    )
    .unwrap();
    let other_form = "9d9d9d9d-0000-4000-8000-000000000001";
    for (id, form, name, at) in [
        ("1a000000-0000-4000-8000-000000000001", form_id.as_str(), "Ana", "2025-05-01T09:00:00Z"),
        ("1a000000-0000-4000-8000-000000000002", other_form, "Bia", "2025-05-02T09:00:00Z"),
        ("1a000000-0000-4000-8000-000000000003", form_id.as_str(), "Caio", "2025-05-03T09:00:00Z"),
    ] {
        let row = serde_json::json!({
            "id": id,
            "formulario_id": form,
            "respostas": {"f1": name, "f2": "Quando é a próxima audiência?"},
            "created_at": at,
        });
        conn.execute(
            "INSERT INTO formulario_respostas (id, data) VALUES (?1, ?2)",
            rusqlite::params![id, row.to_string()],
        )
        .unwrap();
    }
    drop(conn);

    let output = signed_in(tmp.path())
        .args(["responses", &form_id[..8], "--json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let responses: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = responses
        .iter()
        .filter_map(|r| r["respostas"]["f1"].as_str())
        .collect();
    assert_eq!(names, vec!["Caio", "Ana"]);

    let output = signed_in(tmp.path())
        .args(["responses", &form_id])
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Fale com o vereador"));
    assert!(stdout.contains("Nome: Caio"));
    assert!(stdout.contains("Mensagem: Quando é a próxima audiência?"));

    let output = signed_in(tmp.path())
        .args(["update", "respostas", "1a000000", "respostas={}"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("read-only"));

    let output = camara_cmd(tmp.path())
        .args(["route", &format!("/admin/formularios/{}/respostas", form_id)])
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("AdminFormResponses"));
}

#[test]
fn test_board_list_shows_member() {
    let tmp = TempDir::new().unwrap();
    create(tmp.path(), "vereadores", r#"{"nome": "Ana Souza", "partido": "PV"}"#);
    let member_id = list_json(tmp.path(), "vereadores")[0]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let output = create(
        tmp.path(),
        "mesa-diretora",
        &format!(r#"{{"cargo": "Presidente", "vereador_id": "{}", "periodo_inicio": "2025-01-01"}}"#, member_id),
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let output = signed_in(tmp.path())
        .args(["list", "mesa-diretora"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Presidente - Ana Souza (PV)"));
}
