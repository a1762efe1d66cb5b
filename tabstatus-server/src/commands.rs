// File: tabstatus-server/src/commands.rs

use tabstatus_common::models::Participant;
use tabstatus_common::traits::Presence;
use tabstatus_core::Error;
use crate::context::ServerContext;

const HELP: &str = "\
Commands:
  join <name>                      bring a participant online
  leave <name>
  grant <name> <capability>        '*' grants everything
  revoke <name> <capability>
  status <name> <text...|remove>   participant sets (or removes) their own status
  setstatus <actor> <target> <text...>
  group <name> <group>             participant picks a status group
  remove <target>                  remove a status as the console
  say <name> <message...>
  placeholder <name> <identifier>  e.g. status, status_<name>
  reload
  setmaxlength <n>
  resetmaxlength
  groupmode <on|off>               only group statuses for non-admins
  list
  groups
  help
  quit
Use &_ for a space inside a status.
";

/// Runs one console line. Returns `(quit_requested, output)`.
pub async fn dispatch(line: &str, ctx: &ServerContext) -> (bool, Option<String>) {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let cmd = parts.first().map(|c| c.to_lowercase()).unwrap_or_default();
    let args = parts.get(1..).unwrap_or(&[]);

    let result = match cmd.as_str() {
        "" => return (false, None),
        "help" => Ok(HELP.to_string()),
        "quit" | "exit" | "stop" => return (true, Some("Shutting down...".to_string())),
        "join" => handle_join(args, ctx).await,
        "leave" => handle_leave(args, ctx),
        "grant" => handle_grant(args, ctx, true),
        "revoke" => handle_grant(args, ctx, false),
        "status" => handle_status(args, ctx).await,
        "setstatus" => handle_setstatus(args, ctx).await,
        "group" => handle_group(args, ctx).await,
        "remove" => handle_remove(args, ctx).await,
        "say" => handle_say(args, ctx).await,
        "placeholder" => handle_placeholder(args, ctx).await,
        "reload" => ctx
            .manager
            .reload_as(&ctx.console())
            .await
            .map(|n| format!("Config and statuses reloaded ({} status(es)).", n)),
        "setmaxlength" => handle_setmaxlength(args, ctx).await,
        "resetmaxlength" => ctx
            .manager
            .reset_max_status_length(&ctx.console())
            .await
            .map(|_| format!("Max status length reset to {}.", ctx.manager.max_status_length())),
        "groupmode" => handle_groupmode(args, ctx).await,
        "list" => Ok(handle_list(ctx).await),
        "groups" => Ok(handle_groups(ctx)),
        other => Ok(format!("Unknown command '{}'. Type 'help' for commands.", other)),
    };

    match result {
        Ok(msg) => (false, Some(msg)),
        Err(e) if e.is_user_facing() => (false, Some(e.to_string())),
        Err(e) => {
            tracing::error!("Command '{}' failed: {:?}", line.trim(), e);
            (false, Some(format!("Command failed: {}", e)))
        }
    }
}

fn usage(text: &str) -> Result<String, Error> {
    Ok(format!("Usage: {}", text))
}

async fn handle_join(args: &[&str], ctx: &ServerContext) -> Result<String, Error> {
    let [name] = args else {
        return usage("join <name>");
    };
    match ctx.join(name).await {
        Some(p) => Ok(format!("{} joined.", p.name)),
        None => Ok(format!("{} is already online.", name)),
    }
}

fn handle_leave(args: &[&str], ctx: &ServerContext) -> Result<String, Error> {
    let [name] = args else {
        return usage("leave <name>");
    };
    match ctx.roster.leave(name) {
        Some(p) => Ok(format!("{} left.", p.name)),
        None => Err(Error::NotFound(format!("Player '{}' not found.", name))),
    }
}

/// Capabilities are keyed by the name-derived id, so offline participants
/// can be prepared too.
fn handle_grant(args: &[&str], ctx: &ServerContext, grant: bool) -> Result<String, Error> {
    let [name, capability] = args else {
        return usage(if grant { "grant <name> <capability>" } else { "revoke <name> <capability>" });
    };
    let participant = ctx
        .roster
        .find_online(name)
        .unwrap_or_else(|| Participant::named(*name));
    if grant {
        ctx.capabilities.grant(participant.id, capability);
        Ok(format!("Granted {} to {}.", capability, participant.name))
    } else if ctx.capabilities.revoke(&participant.id, capability) {
        Ok(format!("Revoked {} from {}.", capability, participant.name))
    } else {
        Ok(format!("{} did not have {}.", participant.name, capability))
    }
}

async fn handle_status(args: &[&str], ctx: &ServerContext) -> Result<String, Error> {
    let Some((name, text)) = args.split_first() else {
        return usage("status <name> <text...|remove>");
    };
    let participant = ctx.manager.find_participant(name)?;
    if text.is_empty() {
        return Ok(match ctx.manager.get_status(&participant.id).await {
            Some(raw) => format!("{}'s status: {}", participant.name, raw),
            None => format!("{} has no status.", participant.name),
        });
    }
    if text.len() == 1 && text[0].eq_ignore_ascii_case("remove") {
        ctx.manager.remove_status_as(&participant, &participant).await?;
        return Ok(format!("Status of {} removed.", participant.name));
    }
    ctx.manager
        .set_status(&participant, &text.join(" "), &participant)
        .await?;
    Ok(describe(ctx, &participant).await)
}

async fn handle_setstatus(args: &[&str], ctx: &ServerContext) -> Result<String, Error> {
    let [actor, target, text @ ..] = args else {
        return usage("setstatus <actor> <target> <text...>");
    };
    let actor = if actor.eq_ignore_ascii_case("console") {
        ctx.console()
    } else {
        ctx.manager.find_participant(actor)?
    };
    let target = ctx.manager.find_participant(target)?;
    ctx.manager.set_status(&target, &text.join(" "), &actor).await?;
    Ok(describe(ctx, &target).await)
}

async fn handle_group(args: &[&str], ctx: &ServerContext) -> Result<String, Error> {
    let [name, group] = args else {
        return usage("group <name> <group>");
    };
    let participant = ctx.manager.find_participant(name)?;
    ctx.manager
        .set_group_status(&participant, group, &participant)
        .await?;
    Ok(describe(ctx, &participant).await)
}

async fn handle_remove(args: &[&str], ctx: &ServerContext) -> Result<String, Error> {
    let [target] = args else {
        return usage("remove <target>");
    };
    let target = ctx.manager.find_participant(target)?;
    ctx.manager.remove_status_as(&target, &ctx.console()).await?;
    Ok(format!("Status of {} removed.", target.name))
}

async fn handle_say(args: &[&str], ctx: &ServerContext) -> Result<String, Error> {
    let Some((name, words)) = args.split_first() else {
        return usage("say <name> <message...>");
    };
    let sender = ctx.manager.find_participant(name)?;
    let message = words.join(" ");
    Ok(ctx
        .chat
        .format(&sender, &message)
        .await
        .unwrap_or_else(|| format!("{}: {}", sender.name, message)))
}

async fn handle_placeholder(args: &[&str], ctx: &ServerContext) -> Result<String, Error> {
    let [name, identifier] = args else {
        return usage("placeholder <name> <identifier>");
    };
    let requester = ctx.manager.find_participant(name)?;
    Ok(match ctx.placeholders.resolve(Some(&requester), identifier).await {
        Some(value) => format!("%{}% = '{}'", identifier, value),
        None => format!("%{}% is not a known placeholder.", identifier),
    })
}

async fn handle_setmaxlength(args: &[&str], ctx: &ServerContext) -> Result<String, Error> {
    let [n] = args else {
        return usage("setmaxlength <n>");
    };
    let n: usize = n
        .parse()
        .map_err(|_| Error::ValidationError(format!("'{}' is not a valid length.", n)))?;
    ctx.manager.set_max_status_length(&ctx.console(), n).await?;
    Ok(format!("Max status length set to {}.", n))
}

async fn handle_groupmode(args: &[&str], ctx: &ServerContext) -> Result<String, Error> {
    let enabled = match args {
        [mode] if mode.eq_ignore_ascii_case("on") => true,
        [mode] if mode.eq_ignore_ascii_case("off") => false,
        _ => return usage("groupmode <on|off>"),
    };
    ctx.config.set_group_mode(enabled).await?;
    Ok(format!("Group mode {}.", if enabled { "enabled" } else { "disabled" }))
}

async fn handle_list(ctx: &ServerContext) -> String {
    let online = ctx.manager.online_participants();
    if online.is_empty() {
        return "Nobody is online.".to_string();
    }
    let mut output = format!("Online ({}):\n", online.len());
    for p in online {
        let display = ctx.manager.display_name_for(&p).await;
        output.push_str(&format!("  {}\n", display.list_label));
    }
    output
}

fn handle_groups(ctx: &ServerContext) -> String {
    let snapshot = ctx.config.snapshot();
    if snapshot.groups.is_empty() {
        return "No status groups configured.".to_string();
    }
    let mut output = format!(
        "Status groups (group mode {}):\n",
        if snapshot.config.group_mode { "on" } else { "off" }
    );
    for name in snapshot.groups.names() {
        if let Some(group) = snapshot.groups.resolve(name) {
            output.push_str(&format!("  {} -> {}\n", name, group.canonical_status));
        }
    }
    output
}

async fn describe(ctx: &ServerContext, participant: &Participant) -> String {
    let display = ctx.manager.display_name_for(participant).await;
    format!("{} is now shown as: {}", participant.name, display.list_label)
}
