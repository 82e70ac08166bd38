//! A stand-in game server driven from stdin, for trying the plugin without
//! a real server.

use anyhow::{anyhow, bail, Context, Result};
use rustc_hash::FxHashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::info;
use weaponpaints_core::commands::COMMAND_PREFIX;
use weaponpaints_core::host::GameHost;
use weaponpaints_core::player::{PlayerSlot, PlayerSnapshot, SteamId};
use weaponpaints_core::plugin::WeaponPaints;

struct ConsolePlayer {
    snapshot: PlayerSnapshot,
    active_weapon: Option<u16>,
    alive: bool,
}

#[derive(Default)]
pub struct ConsoleHost {
    players: Mutex<FxHashMap<PlayerSlot, ConsolePlayer>>,
    next_user_id: Mutex<u16>,
}

impl ConsoleHost {
    fn players(&self) -> MutexGuard<'_, FxHashMap<PlayerSlot, ConsolePlayer>> {
        self.players.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn name(&self, slot: PlayerSlot) -> Result<String> {
        self.players()
            .get(&slot)
            .map(|player| player.snapshot.name.clone())
            .ok_or_else(|| anyhow!("no player in slot {}", slot))
    }

    fn join(&self, slot: PlayerSlot, steam_id: SteamId, name: &str, ip_address: Option<&str>) {
        let user_id = {
            let mut next = self.next_user_id.lock().unwrap_or_else(PoisonError::into_inner);
            *next = next.wrapping_add(1);
            *next
        };
        let snapshot = PlayerSnapshot {
            slot,
            user_id: Some(user_id),
            steam_id,
            name: name.to_string(),
            ip_address: ip_address.map(str::to_string),
            is_bot: false,
            is_valid: true,
            language: None,
        };
        self.players().insert(
            slot,
            ConsolePlayer {
                snapshot,
                active_weapon: None,
                alive: true,
            },
        );
        info!("{} joined in slot {}", name, slot);
    }

    fn leave(&self, slot: PlayerSlot) {
        if let Some(player) = self.players().remove(&slot) {
            info!("{} left the game", player.snapshot.name);
        }
    }

    fn set_weapon(&self, slot: PlayerSlot, def_index: Option<u16>) -> Result<()> {
        let mut players = self.players();
        let player = players
            .get_mut(&slot)
            .ok_or_else(|| anyhow!("no player in slot {}", slot))?;
        player.active_weapon = def_index;
        Ok(())
    }
}

impl GameHost for ConsoleHost {
    fn player(&self, slot: PlayerSlot) -> Option<PlayerSnapshot> {
        self.players().get(&slot).map(|player| player.snapshot.clone())
    }

    fn active_weapon(&self, slot: PlayerSlot) -> Option<u16> {
        self.players().get(&slot).and_then(|player| player.active_weapon)
    }

    fn give_gloves(&self, slot: PlayerSlot) -> Result<()> {
        info!("Gave gloves to {}", self.name(slot)?);
        Ok(())
    }

    fn refresh_weapons(&self, slot: PlayerSlot) -> Result<()> {
        info!("Refreshed weapons of {}", self.name(slot)?);
        Ok(())
    }

    fn give_agent(&self, slot: PlayerSlot) -> Result<()> {
        info!("Gave agent to {}", self.name(slot)?);
        Ok(())
    }

    fn give_music_kit(&self, slot: PlayerSlot) -> Result<()> {
        info!("Gave music kit to {}", self.name(slot)?);
        Ok(())
    }

    fn give_pin(&self, slot: PlayerSlot) -> Result<()> {
        info!("Gave pin to {}", self.name(slot)?);
        Ok(())
    }

    fn has_alive_pawn(&self, slot: PlayerSlot) -> bool {
        self.players().get(&slot).is_some_and(|player| player.alive)
    }

    fn commit_suicide(&self, slot: PlayerSlot) -> Result<()> {
        let mut players = self.players();
        let player = players
            .get_mut(&slot)
            .ok_or_else(|| anyhow!("no player in slot {}", slot))?;
        player.alive = false;
        info!("{} died", player.snapshot.name);
        Ok(())
    }

    fn print_to_chat(&self, slot: PlayerSlot, message: &str) {
        let name = self.name(slot).unwrap_or_default();
        println!("[chat -> {}]{}", name, weaponpaints_text::strip_colors(message));
    }
}

fn parse_slot(arg: Option<&str>) -> Result<PlayerSlot> {
    let arg = arg.context("missing slot")?;
    Ok(PlayerSlot(arg.parse().with_context(|| format!("invalid slot {arg}"))?))
}

/// Handles one line of console input. Returns `false` once the console
/// should exit.
pub fn handle_line(host: &ConsoleHost, plugin: &WeaponPaints, line: &str) -> Result<bool> {
    let line = line.trim();
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let mut args = rest.split_whitespace();

    match command {
        "" => {}
        "quit" | "exit" => return Ok(false),
        "join" => {
            let slot = parse_slot(args.next())?;
            let steam_id = args
                .next()
                .context("missing steam id")?
                .parse()
                .context("invalid steam id")?;
            let name = args.next().context("missing name")?;
            host.join(slot, SteamId(steam_id), name, args.next());
        }
        "leave" => {
            let slot = parse_slot(args.next())?;
            plugin.on_player_disconnect(slot);
            host.leave(slot);
        }
        "respawn" => {
            let slot = parse_slot(args.next())?;
            let mut players = host.players();
            if let Some(player) = players.get_mut(&slot) {
                player.alive = true;
            }
        }
        "weapon" => {
            let slot = parse_slot(args.next())?;
            let def_index = args
                .next()
                .map(str::parse)
                .transpose()
                .context("invalid item definition index")?;
            host.set_weapon(slot, def_index)?;
        }
        "say" => {
            let slot = parse_slot(args.next())?;
            let message = rest.trim_start().split_once(' ').map_or("", |(_, msg)| msg);
            if !plugin.on_client_command(slot, message) {
                info!("<{}> {}", host.name(slot)?, message);
            }
        }
        "map" => match args.next() {
            Some("start") => plugin.on_map_start(),
            Some("end") => plugin.on_map_end(),
            _ => bail!("usage: map <start|end>"),
        },
        "commands" => {
            for command in plugin.registry().commands() {
                let names = std::iter::once(command.name())
                    .chain(command.aliases().iter().map(String::as_str))
                    .map(|name| format!("{}{}", COMMAND_PREFIX, name))
                    .collect::<Vec<_>>();
                println!("{:<28} {}", names.join(", "), command.get_description());
            }
        }
        _ => {
            if !plugin.on_console_command(line) {
                bail!("unknown command {}", command);
            }
        }
    }
    Ok(true)
}
