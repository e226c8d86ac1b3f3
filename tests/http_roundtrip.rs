/// End-to-end test: a real HTTP client against the bridge and the demo world
mod common;

use common::demo_world_path;
use turnlink::bridge::TurnBridge;
use turnlink::config::Config;
use turnlink::game::{play, Game};
use turnlink::wire::{extract_body, extract_footer, Footer};

#[tokio::test]
async fn browser_session_from_init_to_quit() {
    let assets = tempfile::tempdir().unwrap();
    std::fs::write(assets.path().join("index.html"), "<html>client</html>").unwrap();

    let mut config = Config::default();
    config.server.port = 0;
    config.server.inactivity_timeout_secs = Some(10);
    config.server.asset_root = assets.path().display().to_string();
    config.game.world = demo_world_path().display().to_string();

    let mut game = Game::load(config.clone()).unwrap();
    let mut bridge = TurnBridge::from_config(&config);
    let addr = bridge.start().await.unwrap();
    game.intro(&mut bridge);

    let base = format!("http://{}", addr);
    let client_base = base.clone();
    let client = tokio::spawn(async move {
        let http = reqwest::Client::new();
        let post = |path: &str, body: &str| {
            http.post(format!("{}{}", client_base, path))
                .body(body.to_string())
                .send()
        };

        let init = post("/game/init", "").await.unwrap().text().await.unwrap();
        let index = http
            .get(format!("{}/", client_base))
            .send()
            .await
            .unwrap();
        let index_status = index.status().as_u16();
        let index_body = index.text().await.unwrap();
        let missing = http
            .get(format!("{}/nothing.js", client_base))
            .send()
            .await
            .unwrap()
            .status()
            .as_u16();
        let north = post("/game/cmd", "north").await.unwrap().text().await.unwrap();
        let quit = post("/game/cmd", "quit").await.unwrap().text().await.unwrap();
        (init, index_status, index_body, missing, north, quit)
    });

    play(&mut bridge, &mut game).await.unwrap();
    bridge.closed().await;
    let (init, index_status, index_body, missing, north, quit) = client.await.unwrap();

    let body = extract_body(&init).unwrap();
    assert!(body.starts_with("<b>The Troll Bridge</b><br>"), "{}", body);
    assert!(body.contains(r#"<a href="?east">east</a>"#), "{}", body);
    match extract_footer(&init) {
        Some(Footer::Turn { affordances, objects }) => {
            assert!(objects.contains(&"wooden chest".to_string()));
            assert!(!objects.contains(&"sky".to_string()));
            let go = affordances.iter().find(|a| a.verb() == Some("Go")).unwrap();
            assert_eq!(go.objects(), Some(&["east".to_string(), "north".to_string()][..]));
        }
        other => panic!("expected a turn footer, got {:?}", other),
    }

    assert_eq!(index_status, 200);
    assert_eq!(index_body, "<html>client</html>");
    assert_eq!(missing, 404);

    assert!(extract_body(&north).unwrap().starts_with("<b>Orchard</b>"));
    assert!(!north.contains("Troll Bridge"), "resumed intro is not repeated");

    assert!(quit.contains("Goodbye."));
    assert!(extract_footer(&quit).unwrap().is_game_over());

    let after = reqwest::Client::new()
        .post(format!("{}/game/cmd", base))
        .body("look")
        .send()
        .await;
    assert!(after.map(|r| !r.status().is_success()).unwrap_or(true));
}
