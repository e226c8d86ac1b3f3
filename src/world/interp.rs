//! Command interpreter for the reference world.
//!
//! Parsing is deliberately small: a verb (matched by its display name or a
//! short alias), then object names split on the verb's preposition. Every
//! action is verified with the same rules the affordance engine probes, so
//! whatever the client offers is exactly what the interpreter accepts.
use log::debug;

use crate::afford::{
    ActionCandidate, Entity, ObjectionClass, ScopeResolver, VerbDescriptor, VerbKind,
    VerbRegistry, Verification,
};
use crate::bridge::Transcript;

use super::resolve::{format_choices, normalize_name, resolve, Resolution};
use super::types::{Direction, ItemFlag, Location};
use super::{list_with_articles, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    GameOver,
}

const ALIASES: &[(&str, &str)] = &[
    ("l", "look"),
    ("i", "inventory"),
    ("inv", "inventory"),
    ("x", "examine"),
    ("z", "wait"),
    ("take", "take"),
    ("pick", "take"),
    ("hit", "attack"),
    ("kill", "attack"),
];

/// Run one player command against the world.
pub fn execute(
    world: &mut World,
    registry: &VerbRegistry,
    command: &str,
    markup: bool,
    out: &mut dyn Transcript,
) -> Outcome {
    let lowered = command.trim().to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();

    match words.as_slice() {
        [] => {
            out.say("Pardon?\n");
            return Outcome::Continue;
        }
        ["quit"] | ["q"] => {
            out.say("Goodbye.\n");
            return Outcome::GameOver;
        }
        [word] if Direction::parse(word).is_some() => {
            return travel(world, word, markup, out);
        }
        ["go" | "walk", word] => {
            return travel(world, word, markup, out);
        }
        _ => {}
    }

    let Some((verbs, consumed)) = match_verbs(registry, &words) else {
        out.say("I don't know how to do that.\n");
        return Outcome::Continue;
    };
    let rest = words[consumed..].join(" ");
    let (verb, direct, indirect) = split_objects(&verbs, &rest);
    debug!("Parsed '{}' as {} [{}] [{}]", command, verb.id, direct, indirect);

    match verb.kind {
        VerbKind::Intransitive => perform(world, verb, None, None, markup, out),
        VerbKind::Travel => {
            if direct.is_empty() {
                out.say("Which way do you want to go?\n");
                Outcome::Continue
            } else {
                travel(world, &direct, markup, out)
            }
        }
        VerbKind::Transitive => {
            if direct.is_empty() {
                out.say(&format!("What do you want to {}?\n", verb.name.to_lowercase()));
                return Outcome::Continue;
            }
            let Some(target) = find(world, &direct, out) else {
                return Outcome::Continue;
            };
            attempt(world, verb, Some(&target), None, markup, out)
        }
        VerbKind::Topic => {
            if direct.is_empty() || indirect.is_empty() {
                out.say(&format!("{} whom about what?\n", verb.name));
                return Outcome::Continue;
            }
            let Some(target) = find(world, &direct, out) else {
                return Outcome::Continue;
            };
            converse(world, verb, &target, &indirect, out)
        }
        VerbKind::Ditransitive => {
            if direct.is_empty() {
                out.say(&format!("What do you want to {}?\n", verb.name.to_lowercase()));
                return Outcome::Continue;
            }
            if indirect.is_empty() {
                let prep = verb.preposition.as_deref().unwrap_or("with");
                out.say(&format!(
                    "What do you want to {} it {}?\n",
                    verb.name.to_lowercase(),
                    prep
                ));
                return Outcome::Continue;
            }
            let Some(first) = find(world, &direct, out) else {
                return Outcome::Continue;
            };
            let Some(second) = find(world, &indirect, out) else {
                return Outcome::Continue;
            };
            attempt(world, verb, Some(&first), Some(&second), markup, out)
        }
        VerbKind::Indeterminate => {
            out.say("Nothing happens.\n");
            Outcome::Continue
        }
    }
}

/// Verbs whose name (or alias) starts the command, plus the number of
/// words consumed. Longest name wins.
fn match_verbs<'r>(
    registry: &'r VerbRegistry,
    words: &[&str],
) -> Option<(Vec<&'r VerbDescriptor>, usize)> {
    let alias = ALIASES
        .iter()
        .find(|(a, _)| Some(a) == words.first())
        .map(|(_, id)| *id);

    let mut best: Vec<&VerbDescriptor> = Vec::new();
    let mut best_len = 0;
    for verb in registry.iter() {
        let name = normalize_name(&verb.name);
        let name_words: Vec<&str> = name.split_whitespace().collect();
        let len = if !name_words.is_empty() && words.starts_with(&name_words) {
            name_words.len()
        } else if alias == Some(verb.id.as_str()) {
            1
        } else {
            continue;
        };
        if len > best_len {
            best.clear();
            best_len = len;
        }
        if len == best_len {
            best.push(verb);
        }
    }
    (!best.is_empty()).then_some((best, best_len))
}

/// Pick the verb whose preposition splits the remaining words, falling back
/// to the first candidate.
fn split_objects<'r>(verbs: &[&'r VerbDescriptor], rest: &str) -> (&'r VerbDescriptor, String, String) {
    for verb in verbs {
        if let Some(prep) = &verb.preposition {
            let needle = format!(" {} ", prep);
            if let Some(pos) = rest.find(&needle) {
                let direct = rest[..pos].trim().to_string();
                let indirect = rest[pos + needle.len()..].trim().to_string();
                return (*verb, direct, indirect);
            }
        }
    }
    let verb = verbs
        .iter()
        .find(|v| v.arity().unwrap_or(0) < 3)
        .unwrap_or(&verbs[0]);
    (*verb, rest.trim().to_string(), String::new())
}

fn find(world: &World, query: &str, out: &mut dyn Transcript) -> Option<Entity> {
    let scope = match world.scope(world.player()) {
        Ok(scope) => scope,
        Err(e) => {
            out.say(&format!("Something is wrong with the world: {}\n", e));
            return None;
        }
    };
    match resolve(query, &scope) {
        Resolution::Found(entity) => Some(entity),
        Resolution::Ambiguous(names) => {
            out.say(&format!("Do you mean {}?\n", format_choices(&names)));
            None
        }
        Resolution::NotFound => {
            out.say(&format!("You see no {} here.\n", query));
            None
        }
    }
}

/// Verify first; refuse blocked actions, perform the rest.
fn attempt(
    world: &mut World,
    verb: &VerbDescriptor,
    direct: Option<&Entity>,
    indirect: Option<&Entity>,
    markup: bool,
    out: &mut dyn Transcript,
) -> Outcome {
    let candidate = ActionCandidate {
        actor: world.player(),
        verb,
        direct,
        indirect,
    };
    if let Verification::Objection(objection) = world.judge(&candidate) {
        use ObjectionClass::*;
        if matches!(
            objection.class,
            Illogical | IllogicalSelf | IllogicalNow | IllogicalAlready | Inaccessible
        ) {
            out.say(&refusal(verb, objection.class, direct, indirect));
            return Outcome::Continue;
        }
    }
    perform(world, verb, direct, indirect, markup, out)
}

fn name_of(entity: Option<&Entity>) -> &str {
    entity.and_then(|e| e.display_name()).unwrap_or("that")
}

fn refusal(
    verb: &VerbDescriptor,
    class: ObjectionClass,
    direct: Option<&Entity>,
    indirect: Option<&Entity>,
) -> String {
    use ObjectionClass::*;
    let d = name_of(direct);
    let i = name_of(indirect);
    let line = match (verb.id.as_str(), class) {
        ("take", IllogicalAlready) => format!("You already have the {}.", d),
        ("drop" | "show_to" | "give_to", IllogicalNow) => {
            format!("You aren't carrying the {}.", d)
        }
        ("open", IllogicalAlready) => format!("The {} is already open.", d),
        ("open", IllogicalNow) => format!("The {} is locked.", d),
        ("close", IllogicalAlready) => format!("The {} is already closed.", d),
        ("unlock_with", IllogicalAlready) => format!("The {} isn't locked.", d),
        ("put_in", IllogicalAlready) => format!("The {} is already in the {}.", d, i),
        ("put_in", IllogicalNow) => format!("The {} is closed.", i),
        (_, IllogicalSelf) => format!(
            "You can't {} something {} itself.",
            verb.name.to_lowercase(),
            verb.preposition.as_deref().unwrap_or("with")
        ),
        (_, Inaccessible) => format!("You can't reach the {}.", d),
        (_, IllogicalAlready) => "That's already done.".to_string(),
        (_, IllogicalNow) => "You can't do that right now.".to_string(),
        _ if direct.is_some() => format!("You can't {} the {}.", verb.name.to_lowercase(), d),
        _ => format!("You can't {}.", verb.name.to_lowercase()),
    };
    format!("{}\n", line)
}

fn travel(world: &mut World, word: &str, markup: bool, out: &mut dyn Transcript) -> Outcome {
    let Some(direction) = Direction::parse(word) else {
        out.say(&format!("'{}' is not a direction.\n", word));
        return Outcome::Continue;
    };
    let Some(target) = world
        .current_room()
        .and_then(|r| r.exit(direction))
        .map(|e| e.to.clone())
    else {
        out.say("You can't go that way.\n");
        return Outcome::Continue;
    };
    if let Some(block) = world.npcs_here().find_map(|n| n.blocks(direction)) {
        out.say(&format!("{}\n", block.message));
        return Outcome::Continue;
    }
    world.move_player(&target);
    out.say(&world.describe_room(markup));
    Outcome::Continue
}

fn perform(
    world: &mut World,
    verb: &VerbDescriptor,
    direct: Option<&Entity>,
    indirect: Option<&Entity>,
    markup: bool,
    out: &mut dyn Transcript,
) -> Outcome {
    let d_id = direct.map(|e| e.id.clone()).unwrap_or_default();
    let i_id = indirect.map(|e| e.id.clone()).unwrap_or_default();
    let d = name_of(direct).to_string();
    let i = name_of(indirect).to_string();

    match verb.id.as_str() {
        "look" => out.say(&world.describe_room(markup)),
        "wait" => out.say("Time passes.\n"),
        "inventory" => {
            let held: Vec<&str> = world.inventory().into_iter().map(|i| i.name.as_str()).collect();
            if held.is_empty() {
                out.say("You are empty-handed.\n");
            } else {
                out.say(&format!("You are carrying {}.\n", list_with_articles(&held)));
            }
        }
        "examine" => examine(world, &d_id, markup, out),
        "take" => {
            set_location(world, &d_id, Location::Player);
            out.say("Taken.\n");
            if world.victory_item.as_deref() == Some(d_id.as_str()) {
                let message = world
                    .victory_message
                    .clone()
                    .unwrap_or_else(|| "You have won!".to_string());
                out.say(&format!("{}\n", message));
                return Outcome::GameOver;
            }
        }
        "drop" => {
            let here = Location::Room(world.here().to_string());
            set_location(world, &d_id, here);
            out.say("Dropped.\n");
        }
        "open" => {
            if let Some(item) = world.item_mut(&d_id) {
                item.open = true;
            }
            out.say(&format!("You open the {}.\n", d));
            let inside: Vec<&str> = world.contents(&d_id).into_iter().map(|i| i.name.as_str()).collect();
            if !inside.is_empty() {
                out.say(&format!("Inside you find {}.\n", list_with_articles(&inside)));
            }
        }
        "close" => {
            if let Some(item) = world.item_mut(&d_id) {
                item.open = false;
            }
            out.say(&format!("You close the {}.\n", d));
        }
        "eat" => {
            set_location(world, &d_id, Location::Nowhere);
            out.say(&format!("You eat the {}. Not bad.\n", d));
        }
        "attack" => {
            let reply = world
                .npc(&d_id)
                .and_then(|n| n.attack_reply.clone())
                .unwrap_or_else(|| "Violence isn't the answer to this one.".to_string());
            out.say(&format!("{}\n", reply));
        }
        "put_in" => {
            set_location(world, &d_id, Location::Inside(i_id.clone()));
            out.say(&format!("You put the {} in the {}.\n", d, i));
        }
        "unlock_with" => {
            let fits = world
                .item(&i_id)
                .and_then(|k| k.key_for.as_deref())
                .is_some_and(|target| target == d_id);
            if fits {
                if let Some(item) = world.item_mut(&d_id) {
                    item.locked = false;
                }
                out.say(&format!("You unlock the {} with the {}.\n", d, i));
            } else {
                out.say(&format!("The {} doesn't fit the {}.\n", i, d));
            }
        }
        "show_to" | "give_to" => {
            let topic = world
                .npc(&i_id)
                .and_then(|n| n.find_topic(&verb.id, &d))
                .cloned();
            match topic {
                Some(topic) => {
                    if verb.id == "give_to" {
                        set_location(world, &d_id, Location::Nowhere);
                    }
                    apply_topic(world, &i_id, &topic.reply, topic.next_state, out);
                }
                None if verb.id == "give_to" => {
                    out.say(&format!("The {} doesn't want the {}.\n", i, d));
                }
                None => out.say(&format!("The {} shows no interest in the {}.\n", i, d)),
            }
        }
        _ => out.say("Nothing happens.\n"),
    }
    Outcome::Continue
}

fn examine(world: &World, id: &str, markup: bool, out: &mut dyn Transcript) {
    if world.room(id).is_some() {
        out.say(&world.describe_room(markup));
        return;
    }
    if let Some(npc) = world.npc(id) {
        out.say(&format!("{}\n", npc.description));
        return;
    }
    let Some(item) = world.item(id) else {
        out.say("You see nothing special.\n");
        return;
    };
    out.say(&format!("{}\n", item.description));
    if item.has(ItemFlag::Container) {
        if item.locked {
            out.say(&format!("The {} is locked.\n", item.name));
        } else if !item.open {
            out.say(&format!("The {} is closed.\n", item.name));
        } else {
            let inside: Vec<&str> = world.contents(id).into_iter().map(|i| i.name.as_str()).collect();
            if inside.is_empty() {
                out.say(&format!("The {} is empty.\n", item.name));
            } else {
                out.say(&format!("It contains {}.\n", list_with_articles(&inside)));
            }
        }
    }
}

fn converse(
    world: &mut World,
    verb: &VerbDescriptor,
    target: &Entity,
    subject: &str,
    out: &mut dyn Transcript,
) -> Outcome {
    let Some(npc) = world.npc(&target.id) else {
        out.say(&format!("The {} isn't much of a conversationalist.\n", name_of(Some(target))));
        return Outcome::Continue;
    };
    let topic = npc.find_topic(&verb.id, subject).cloned();
    let name = npc.name.clone();
    match topic {
        Some(topic) => apply_topic(world, &target.id, &topic.reply, topic.next_state, out),
        None => out.say(&format!("The {} has nothing to say about that.\n", name)),
    }
    Outcome::Continue
}

fn apply_topic(
    world: &mut World,
    npc_id: &str,
    reply: &str,
    next_state: Option<String>,
    out: &mut dyn Transcript,
) {
    out.say(&format!("{}\n", reply));
    if let (Some(state), Some(npc)) = (next_state, world.npc_mut(npc_id)) {
        debug!("{} moves to state '{}'", npc.id, state);
        npc.state = Some(state);
    }
}

fn set_location(world: &mut World, id: &str, location: Location) {
    if let Some(item) = world.item_mut(id) {
        item.location = location;
    }
}
