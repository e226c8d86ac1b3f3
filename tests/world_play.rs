/// Integration tests for the reference world played through `Game`
mod common;

use common::demo_world_path;
use turnlink::bridge::TurnView;
use turnlink::config::Config;
use turnlink::game::Game;
use turnlink::wire::render_output;
use turnlink::world::{Outcome, World, WorldError};

fn demo() -> Game {
    let mut config = Config::default();
    config.game.world = demo_world_path().display().to_string();
    Game::load(config).unwrap().with_markup(false)
}

fn say(game: &mut Game, command: &str) -> (String, Outcome) {
    let mut out = String::new();
    let outcome = game.handle(command, &mut out);
    (out, outcome)
}

#[test]
fn full_walkthrough_ends_in_victory() {
    let mut g = demo();
    let steps = [
        ("n", "Orchard\n"),
        ("get key", "Taken.\n"),
        ("s", "Meadow\n"),
        ("unlock chest with key", "You unlock the wooden chest with the iron key.\n"),
        ("open chest", "You open the wooden chest.\nInside you find a silver fish.\n"),
        ("take fish", "Taken.\n"),
        ("e", "Stone Bridge\n"),
        ("e", "The troll plants itself in your way."),
        ("give fish to troll", "The troll swallows the fish whole"),
        ("e", "Tower Hall\n"),
    ];
    for (command, expected) in steps {
        let (text, outcome) = say(&mut g, command);
        assert!(text.starts_with(expected), "{} -> {}", command, text);
        assert_eq!(outcome, Outcome::Continue);
    }
    let (text, outcome) = say(&mut g, "get crown");
    assert!(text.contains("the land is yours"));
    assert_eq!(outcome, Outcome::GameOver);
}

#[test]
fn affordances_follow_the_world_state() {
    let mut g = demo();
    say(&mut g, "n");
    let records = g.affordances().unwrap();
    let take: Vec<_> = records.iter().filter(|r| r.verb.id == "take").collect();
    assert_eq!(take.len(), 2);
    assert_eq!(take[0].primary_names(), vec!["apple", "iron key"]);
    assert!(!take[0].weak);
    assert_eq!(take[1].primary_names(), vec!["nettles"]);
    assert!(take[1].weak);

    say(&mut g, "get key");
    say(&mut g, "s");
    let records = g.affordances().unwrap();
    let unlock = records.iter().find(|r| r.verb.id == "unlock_with").unwrap();
    assert_eq!(unlock.primary_names(), vec!["wooden chest"]);
    assert_eq!(unlock.secondary_names(), Some(vec!["iron key".to_string()]));
    let open: Vec<_> = records.iter().filter(|r| r.verb.id == "open").collect();
    assert_eq!(open.len(), 1);
    assert!(open[0].weak, "a locked chest is only weakly openable");
}

#[test]
fn troll_topics_change_with_its_state() {
    let mut g = demo();
    for command in ["n", "get key", "s", "unlock chest with key", "open chest", "get fish", "e"] {
        say(&mut g, command);
    }
    let records = g.affordances().unwrap();
    let ask = records.iter().find(|r| r.verb.id == "ask_about").unwrap();
    assert_eq!(ask.primary_names(), vec!["troll"]);
    assert_eq!(
        ask.secondary_names(),
        Some(vec!["bridge".to_string(), "crown".to_string()])
    );
    let give = records.iter().find(|r| r.verb.id == "give_to" && !r.weak).unwrap();
    assert_eq!(give.primary_names(), vec!["silver fish"]);
    assert_eq!(give.secondary_names(), Some(vec!["troll".to_string()]));

    let (text, _) = say(&mut g, "ask troll about crown");
    assert!(text.contains("Not yours"), "{}", text);
    say(&mut g, "give fish to troll");
    let (text, _) = say(&mut g, "ask troll about crown");
    assert!(text.contains("napping"), "{}", text);
}

#[test]
fn hidden_exits_work_but_are_not_offered() {
    let mut g = demo();
    let records = g.affordances().unwrap();
    let go = records.iter().find(|r| r.verb.id == "go").unwrap();
    assert!(!go.primary_names().contains(&"down".to_string()));
    let (text, _) = say(&mut g, "down");
    assert!(text.starts_with("Root Cellar\n"), "{}", text);
}

#[test]
fn refusals_name_the_reason() {
    let mut g = demo();
    assert_eq!(say(&mut g, "open chest").0, "The wooden chest is locked.\n");
    assert_eq!(say(&mut g, "take chest").0, "You can't get the wooden chest.\n");
    assert_eq!(say(&mut g, "drop chest").0, "You can't drop the wooden chest.\n");
    assert_eq!(say(&mut g, "eat grass").0, "You can't eat the grass.\n");
}

#[test]
fn echoed_player_text_cannot_inject_markup() {
    let mut g = demo();
    let (text, _) = say(&mut g, "take <i onmouseover=alert(document.cookie)>");
    let rendered = render_output(&text);
    assert!(!rendered.contains("<i "), "{}", rendered);
    assert!(rendered.contains("&lt;i onmouseover"), "{}", rendered);
}

#[test]
fn missing_seed_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        World::load(dir.path().join("absent.json"), "player"),
        Err(WorldError::Io(_))
    ));
}
