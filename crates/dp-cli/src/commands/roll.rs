use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;
use dp_core::{ActorId, BeatLedger, ConditionCatalog, ConditionTracker, Roster, StandardConditions};
use dp_mechanics::{
    CheckResult, ContestExpr, ContestSpec, Decision, DiceEngine, EngineConfig, ExtendedActionState,
    ExtendedStep, ExtendedSummary, MechError, OutcomeCategory, PendingDecision, RerollRule,
    ResolvedPool, RollCommand, RollMode, RollOptions, RollRecord, Side,
};

pub fn run(
    roster_path: &Path,
    actor: Option<&str>,
    seed: Option<u64>,
    line: &str,
) -> Result<(), String> {
    let command = RollCommand::parse(line).map_err(|e| e.to_string())?;
    let roster = super::load_roster(roster_path)?;
    let actor = super::pick_actor(&roster, actor)?;

    let mut config = EngineConfig::default();
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    let mut engine = DiceEngine::new(config);
    let mut beats = BeatLedger::new();

    match command.mode {
        RollMode::Single => {
            let contest = match &command.contest {
                Some(expr) => Some(bind_contest(&roster, expr)?),
                None => None,
            };
            let check = engine
                .resolve_and_roll(
                    &command.pool,
                    actor,
                    &command.options,
                    contest.as_ref(),
                    &roster,
                    &mut beats,
                )
                .map_err(|e| describe(&roster, e))?;
            if let Some(expr) = &command.contest {
                println!("  {} {expr}", "vs".dimmed());
            }
            print_check(&roster, &check, &command.options);
        }
        RollMode::Opposed => {
            let expr = command
                .contest
                .as_ref()
                .ok_or_else(|| "opposed rolls need a 'vs <target>:<traits>' clause".to_string())?;
            let defender = find_target(&roster, expr)?;
            let result = engine
                .resolve_opposed(
                    &command.pool,
                    actor,
                    &expr.to_pool_spec(),
                    defender,
                    &command.options,
                    &roster,
                    &mut beats,
                )
                .map_err(|e| describe(&roster, e))?;

            print_check(&roster, &result.attacker, &command.options);
            println!();
            print_check(&roster, &result.defender, &RollOptions::default());
            println!();
            let verdict = match result.winner {
                Some(side) => {
                    let winner = match side {
                        Side::Attacker => actor,
                        Side::Defender => defender,
                    };
                    format!("{} wins by {}", roster.display_name(winner), result.margin)
                        .green()
                        .bold()
                }
                None => "Tie".yellow().bold(),
            };
            println!("  {verdict}");
        }
        RollMode::Extended { target, max_rolls } => {
            let catalog = StandardConditions::new();
            let mut conditions = ConditionTracker::new();
            let step = engine
                .start_extended(
                    &command.pool,
                    actor,
                    target,
                    max_rolls,
                    &command.options,
                    &roster,
                    &mut beats,
                )
                .map_err(|e| describe(&roster, e))?;

            println!(
                "  {} {} rolls {} toward {target} successes",
                "Extended action:".bold(),
                roster.display_name(actor),
                command.pool
            );
            if let ExtendedStep::Awaiting(state) = &step {
                print_extended_header(state);
            } else if let Some(summary) = step.summary() {
                println!("  Max rolls: {}", summary.max_rolls);
            }
            println!();

            let summary = drive_extended(
                &mut engine,
                actor,
                step,
                &catalog,
                &mut conditions,
                &mut beats,
            )?;
            print_summary(&summary, &catalog);
        }
    }

    for award in beats.awards() {
        println!(
            "  {} {} ({})",
            "Beat awarded to".cyan(),
            roster.display_name(award.actor).cyan().bold(),
            award.kind
        );
    }
    Ok(())
}

/// Resolve the `vs` clause of a single roll into a contest.
fn bind_contest(roster: &Roster, expr: &ContestExpr) -> Result<ContestSpec, String> {
    match expr {
        ContestExpr::Static(value) => Ok(ContestSpec::Static(*value)),
        ContestExpr::Named { .. } => Ok(expr.bind(find_target(roster, expr)?)),
    }
}

fn find_target(roster: &Roster, expr: &ContestExpr) -> Result<ActorId, String> {
    let name = expr
        .target()
        .ok_or_else(|| format!("'{expr}' does not name a character"))?;
    roster
        .find_by_name(name)
        .map_err(|_| MechError::InvalidContestTarget(name.to_string()).to_string())
}

/// Render an engine error with character names instead of short IDs.
fn describe(roster: &Roster, error: MechError) -> String {
    match error {
        MechError::MissingTrait { actor, name } => {
            format!("{} doesn't have '{name}' set", roster.display_name(actor))
        }
        other => other.to_string(),
    }
}

fn print_check(roster: &Roster, check: &CheckResult, options: &RollOptions) {
    println!(
        "  {} rolls {} = {} dice{}",
        roster.display_name(check.actor).bold(),
        breakdown(&check.pool, check.secret, check.specialty.as_deref()),
        check.pool.dice_count(),
        flags(options)
    );
    println!("  Dice: {}", check.roll);
    println!("  {}", paint(check.outcome.category, &check.outcome.to_string()));
}

/// The pool as a readable sum. Secret rolls hide trait ratings.
fn breakdown(pool: &ResolvedPool, secret: bool, specialty: Option<&str>) -> String {
    let mut out = if pool.traits.is_empty() {
        pool.modifier.to_string()
    } else {
        let terms: Vec<String> = pool
            .traits
            .iter()
            .map(|(name, value)| {
                if secret {
                    name.clone()
                } else {
                    format!("{name} ({value})")
                }
            })
            .collect();
        let mut joined = terms.join(" + ");
        push_signed(&mut joined, pool.modifier, "");
        joined
    };
    push_signed(&mut out, pool.situational.wound_penalty, " wounds");
    let specialty_label = match specialty {
        Some(label) => format!(" specialty ({label})"),
        None => " specialty".to_string(),
    };
    push_signed(&mut out, pool.situational.specialty_bonus, &specialty_label);
    push_signed(&mut out, pool.situational.contest_penalty, " contest");
    out
}

fn push_signed(out: &mut String, value: i32, label: &str) {
    if value == 0 {
        return;
    }
    let sign = if value < 0 { '-' } else { '+' };
    out.push_str(&format!(" {sign} {}{label}", value.unsigned_abs()));
}

fn flags(options: &RollOptions) -> String {
    let mut parts = Vec::new();
    if options.again != RerollRule::TenAgain {
        parts.push(options.again.to_string());
    }
    if options.rote {
        parts.push("rote".to_string());
    }
    if options.reflexive {
        parts.push("reflexive".to_string());
    }
    if options.damage {
        parts.push("damage".to_string());
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" [{}]", parts.join(", "))
    }
}

fn paint(category: OutcomeCategory, text: &str) -> colored::ColoredString {
    match category {
        OutcomeCategory::DramaticFailure => text.red().bold(),
        OutcomeCategory::Failure => text.red(),
        OutcomeCategory::Success => text.green(),
        OutcomeCategory::ExceptionalSuccess => text.green().bold(),
    }
}

fn print_extended_header(state: &ExtendedActionState) {
    println!(
        "  Base pool: {} ({} {} + {} {}) | Max rolls: {}",
        state.base_pool,
        state.attribute,
        state.attribute_value,
        state.skill,
        state.skill_value,
        state.max_rolls
    );
    if let Some(label) = &state.specialty {
        println!("  Specialty: {label} (+{})", state.specialty_bonus);
    }
}

/// Print new rolls and answer every suspension from stdin until the action ends.
fn drive_extended(
    engine: &mut DiceEngine,
    actor: ActorId,
    mut step: ExtendedStep,
    catalog: &StandardConditions,
    conditions: &mut ConditionTracker,
    beats: &mut BeatLedger,
) -> Result<ExtendedSummary, String> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut shown = 0;

    loop {
        let goal = match &step {
            ExtendedStep::Awaiting(state) => state.effective_target(),
            ExtendedStep::Finished(summary) => summary.effective_target,
        };
        let history = step.history();
        for record in history.iter().skip(shown) {
            print_record(record, goal);
        }
        shown = history.len();

        let decision = match &step {
            ExtendedStep::Finished(summary) => return Ok(summary.clone()),
            ExtendedStep::Awaiting(state) => prompt_decision(&mut reader, state, catalog)?,
        };
        step = match decision {
            Some(decision) => engine
                .submit_decision(actor, decision, catalog, conditions, beats)
                .map_err(|e| e.to_string())?,
            None => {
                println!("  (input closed, abandoning)");
                return engine.abandon_extended(actor).map_err(|e| e.to_string());
            }
        };
    }
}

fn print_record(record: &RollRecord, goal: i64) {
    println!("  {} {}", "Roll".bold(), format!("#{}", record.roll_number).bold());
    println!("    Pool: {}", record.pool);
    println!("    Dice: {}", record.dice);
    println!(
        "    Successes: {}",
        paint(record.outcome.category, &record.outcome.to_string())
    );
    println!("    Cumulative: {}/{goal}", record.cumulative);
}

/// Ask the player how to continue. `None` means stdin was closed.
fn prompt_decision(
    reader: &mut impl BufRead,
    state: &ExtendedActionState,
    catalog: &StandardConditions,
) -> Result<Option<Decision>, String> {
    match state.pending_decision {
        PendingDecision::FailureChoice => loop {
            println!();
            println!("  {}", "The roll failed. Choose:".yellow());
            println!("    1 - Accept a Condition and continue");
            println!("    2 - Abandon the action");
            let Some(choice) = read_choice(reader)? else {
                return Ok(None);
            };
            match choice.as_str() {
                "1" => match prompt_condition(reader, catalog)? {
                    Some(Some(id)) => return Ok(Some(Decision::AcceptCondition(id))),
                    Some(None) => continue,
                    None => return Ok(None),
                },
                "2" => return Ok(Some(Decision::Abandon)),
                _ => println!("  Invalid choice."),
            }
        },
        PendingDecision::ExceptionalChoice => loop {
            println!();
            println!("  {}", "Exceptional success! Choose:".green().bold());
            println!("    1 - Reduce required successes by {}", state.skill_value);
            println!("    2 - Reduce time by 25%");
            println!("    3 - Apply exceptional result");
            let Some(choice) = read_choice(reader)? else {
                return Ok(None);
            };
            match choice.as_str() {
                "1" => return Ok(Some(Decision::ReduceTarget)),
                "2" => return Ok(Some(Decision::ReduceTime)),
                "3" => return Ok(Some(Decision::ExceptionalResult)),
                _ => println!("  Invalid choice."),
            }
        },
        PendingDecision::None => Err(format!(
            "extended action is suspended without a question ({})",
            state.pending_decision
        )),
    }
}

/// Pick a condition by number. `Some(None)` means the choice was invalid.
fn prompt_condition(
    reader: &mut impl BufRead,
    catalog: &StandardConditions,
) -> Result<Option<Option<String>>, String> {
    let choices = catalog.list();
    println!();
    for (i, (_, name)) in choices.iter().enumerate() {
        println!("    {}. {name}", i + 1);
    }
    let Some(choice) = read_choice(reader)? else {
        return Ok(None);
    };
    let picked = choice
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| choices.get(i))
        .map(|(id, _)| id.clone());
    if picked.is_none() {
        println!("  Invalid choice.");
    }
    Ok(Some(picked))
}

fn read_choice(reader: &mut impl BufRead) -> Result<Option<String>, String> {
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => return Ok(None), // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if !input.is_empty() {
            return Ok(Some(input.to_string()));
        }
    }
}

fn print_summary(summary: &ExtendedSummary, catalog: &StandardConditions) {
    println!();
    for bonus in &summary.bonuses {
        println!("  Bonus: {bonus}");
    }
    for id in &summary.conditions {
        let name = catalog.get(id).map_or(id.as_str(), |c| c.name.as_str());
        println!("  Condition: {name}");
    }

    let tally = format!(
        "{}/{} successes in {} of {} rolls",
        summary.cumulative_successes,
        summary.effective_target,
        summary.rolls_made,
        summary.max_rolls
    );
    if summary.success {
        println!("  {} {tally}", "SUCCESS:".green().bold());
    } else if summary.abandoned {
        println!("  {} {tally}", "ABANDONED:".red().bold());
    } else {
        println!("  {} {tally}", "INCOMPLETE:".red().bold());
    }
}
