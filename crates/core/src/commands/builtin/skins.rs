use crate::commands::error::{ActionResultExt, CommandResult, PreconditionFailed};
use crate::commands::ExecutionContext;
use crate::cooldown::CooldownCheck;
use crate::timers::DeferredAction;
use chrono::Duration;
use tracing::{debug, trace};

/// The pin is applied a moment after the rest of the loadout so the agent
/// model set just before it is in place.
pub const PIN_DELAY_MS: i64 = 150;

pub(super) fn exec_refresh(ctx: &mut ExecutionContext<'_>) -> CommandResult<()> {
    let plugin = ctx.plugin();
    let config = plugin.config();
    ctx.require(config.command_wp_enabled, "refresh command")?;
    ctx.require(config.skin_enabled, "skins")?;
    if !plugin.commands_allowed() {
        return Err(PreconditionFailed::CommandsSuspended.into());
    }
    let player = ctx.caller()?;

    let now = plugin.clock().now();
    let cooldown = plugin
        .cooldowns()
        .try_acquire(player.identity(), now, config.refresh_cooldown());
    if let CooldownCheck::Limited { remaining } = cooldown {
        let seconds = (remaining + Duration::seconds(1) - Duration::nanoseconds(1)).num_seconds();
        ctx.reply("wp_command_cooldown", &[&seconds]);
        return Ok(());
    }

    if let Some(sync) = plugin.sync() {
        drop(sync.spawn_player_data(player.info()));
    }

    let host = plugin.host();
    let slot = player.slot;
    if config.glove_enabled {
        host.give_gloves(slot).action("give gloves")?;
    }
    host.refresh_weapons(slot).action("refresh weapons")?;
    if config.agent_enabled {
        host.give_agent(slot).action("give agent")?;
    }
    if config.music_enabled {
        host.give_music_kit(slot).action("give music kit")?;
    }
    if config.pins_enabled {
        plugin.timers().schedule(
            now + Duration::milliseconds(PIN_DELAY_MS),
            DeferredAction::GivePin(player.identity()),
        );
    }

    debug!("Refreshed loadout of {} ({})", player.name, player.steam_id);
    ctx.reply("wp_command_refresh_done", &[]);
    Ok(())
}

pub(super) fn exec_info(ctx: &mut ExecutionContext<'_>) -> CommandResult<()> {
    let config = ctx.plugin().config();
    ctx.require(config.skin_enabled, "skins")?;
    ctx.caller()?;

    ctx.reply("wp_info_website", &[&config.website]);
    ctx.reply("wp_info_refresh", &[]);

    let optional = [
        (config.glove_enabled, "wp_info_glove"),
        (config.agent_enabled, "wp_info_agent"),
        (config.music_enabled, "wp_info_music"),
        (config.pins_enabled, "wp_info_pin"),
        (config.knife_enabled, "wp_info_knife"),
    ];
    for (enabled, key) in optional {
        if enabled {
            ctx.reply(key, &[]);
        }
    }
    Ok(())
}

pub(super) fn exec_stattrak(ctx: &mut ExecutionContext<'_>) -> CommandResult<()> {
    let plugin = ctx.plugin();
    let player = ctx.caller()?;
    let host = plugin.host();

    let def_index = host
        .active_weapon(player.slot)
        .ok_or(PreconditionFailed::NoActiveWeapon)?;
    let Some(stattrak) = plugin
        .loadouts()
        .toggle_stattrak(player.steam_id, def_index)
    else {
        trace!("{} has no paint for weapon {}", player.steam_id, def_index);
        return Ok(());
    };

    debug!("StatTrak of weapon {} for {} is now {}", def_index, player.steam_id, stattrak);
    host.refresh_weapons(player.slot).action("refresh weapons")?;
    ctx.reply("wp_stattrak_action", &[]);
    Ok(())
}
