use clap::{Parser, Subcommand};
use pakar_core::{config, InferenceEngine, KnowledgeBase, Match, PartialMatch};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

mod convert;
mod session;

use session::Questionnaire;

#[derive(Parser)]
#[command(name = "pakar")]
#[command(about = "Printer-diagnosis expert system CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer the symptom questionnaire and get a diagnosis
    Interview {
        /// Path to the knowledge-base JSON (defaults to the shipped catalog)
        #[arg(long)]
        kb: Option<PathBuf>,
    },
    /// Diagnose directly from observed symptom codes
    Diagnose {
        /// Observed symptom codes, e.g. G01 G02
        codes: Vec<String>,
        /// Also report rules that partially overlap the observed codes
        #[arg(long)]
        partial: bool,
        /// Path to the knowledge-base JSON (defaults to the shipped catalog)
        #[arg(long)]
        kb: Option<PathBuf>,
    },
    /// List the symptom catalog
    Symptoms {
        /// Path to the knowledge-base JSON (defaults to the shipped catalog)
        #[arg(long)]
        kb: Option<PathBuf>,
    },
    /// List the rule catalog
    Rules {
        /// Path to the knowledge-base JSON (defaults to the shipped catalog)
        #[arg(long)]
        kb: Option<PathBuf>,
    },
    /// Report rule conditions that reference unknown symptom codes
    Lint {
        /// Path to the knowledge-base JSON (defaults to the shipped catalog)
        #[arg(long)]
        kb: Option<PathBuf>,
    },
    /// Convert kerusakan/gejala CSV exports into a knowledge-base JSON
    Convert {
        /// CSV of symptom codes and descriptions
        kerusakan: PathBuf,
        /// CSV of rule codes, condition lists and conclusions
        gejala: PathBuf,
        /// Where to write the JSON document
        #[arg(long, default_value = "data/knowledge_base.json")]
        output: PathBuf,
    },
}

fn load_knowledge(kb: Option<PathBuf>) -> Result<Arc<KnowledgeBase>, Box<dyn std::error::Error>> {
    let path = config::resolve_knowledge_base_path(kb)?;
    Ok(Arc::new(KnowledgeBase::load(&path)?))
}

fn print_matches(matches: &[Match]) {
    for item in matches {
        let conditions: Vec<&str> = item.matched_conditions.iter().map(|c| c.as_str()).collect();
        println!("{}: {}", item.code, item.diagnosis);
        println!("    conditions met: {}", conditions.join(", "));
        if !item.solution.is_empty() {
            println!("    solution: {}", item.solution);
        }
    }
}

fn print_overlap(overlap: &[PartialMatch]) {
    for rule in overlap {
        let marker = if rule.complete { " [complete]" } else { "" };
        println!(
            "{}: {} of {} conditions ({}){}",
            rule.code, rule.matched, rule.total, rule.diagnosis, marker
        );
    }
}

fn read_answer() -> Result<Option<String>, Box<dyn std::error::Error>> {
    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_lowercase()))
}

fn run_interview(engine: &InferenceEngine) -> Result<(), Box<dyn std::error::Error>> {
    let mut questionnaire = Questionnaire::new(engine.knowledge().symptoms().to_vec());
    if questionnaire.total() == 0 {
        println!("The symptom catalog is empty; nothing to ask.");
        return Ok(());
    }

    println!("Printer diagnosis interview.");
    println!("Answer with y (yes), n (no), b (back) or q (quit).");

    loop {
        while !questionnaire.is_finished() {
            let symptom = match questionnaire.current() {
                Some(symptom) => symptom.clone(),
                None => break,
            };

            let reminder = match questionnaire.answer_for(symptom.code.as_str()) {
                Some(true) => " (currently: yes)",
                Some(false) => " (currently: no)",
                None => "",
            };

            println!();
            println!(
                "Question {} of {}",
                questionnaire.position() + 1,
                questionnaire.total()
            );
            print!(
                "Does the printer show this symptom? {}: {}{} [y/n/b/q] ",
                symptom.code, symptom.description, reminder
            );
            io::stdout().flush()?;

            let answer = match read_answer()? {
                Some(answer) => answer,
                None => {
                    println!();
                    println!("Interview cancelled.");
                    return Ok(());
                }
            };

            match answer.as_str() {
                "y" | "ya" => questionnaire.answer(true),
                "n" | "tidak" => questionnaire.answer(false),
                "b" => {
                    if !questionnaire.back() {
                        println!("Already at the first question.");
                    }
                }
                "q" => {
                    println!("Interview cancelled.");
                    return Ok(());
                }
                other => println!("Unrecognised answer {:?}; expected y, n, b or q.", other),
            }
        }

        let selected = questionnaire.selected();
        println!();
        println!(
            "Analysis complete: {} of {} symptoms confirmed.",
            selected.len(),
            questionnaire.total()
        );
        if !selected.is_empty() {
            let codes: Vec<&str> = selected.iter().map(|c| c.as_str()).collect();
            println!("Confirmed symptoms: {}", codes.join(", "));
        }

        let matches = engine.diagnose(&selected);
        println!();
        if matches.is_empty() {
            println!("No diagnosis matched the confirmed symptoms.");
            let overlap = engine.match_partial(&selected);
            if !overlap.is_empty() {
                println!("Closest rules:");
                print_overlap(&overlap);
            }
            println!("Confirm every symptom the printer shows, or consult a technician.");
        } else {
            println!("Diagnosis:");
            print_matches(&matches);
        }

        println!();
        print!("Start a new diagnosis? [y/n] ");
        io::stdout().flush()?;
        match read_answer()? {
            Some(answer) if matches!(answer.as_str(), "y" | "ya") => questionnaire.reset(),
            _ => return Ok(()),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Interview { kb }) => {
            let engine = InferenceEngine::new(load_knowledge(kb)?);
            run_interview(&engine)?;
        }
        Some(Commands::Diagnose { codes, partial, kb }) => {
            let engine = InferenceEngine::new(load_knowledge(kb)?);

            let matches = engine.diagnose(&codes);
            if matches.is_empty() {
                println!("No diagnosis matched the observed symptoms.");
            } else {
                print_matches(&matches);
            }

            if partial {
                let overlap = engine.match_partial(&codes);
                if overlap.is_empty() {
                    println!("No rule shares a condition with the observed symptoms.");
                } else {
                    println!("Overlap:");
                    print_overlap(&overlap);
                }
            }
        }
        Some(Commands::Symptoms { kb }) => {
            let knowledge = load_knowledge(kb)?;
            if knowledge.symptoms().is_empty() {
                println!("No symptoms in the catalog.");
            } else {
                for symptom in knowledge.symptoms() {
                    println!("{}: {}", symptom.code, symptom.description);
                }
            }
        }
        Some(Commands::Rules { kb }) => {
            let knowledge = load_knowledge(kb)?;
            if knowledge.rules().is_empty() {
                println!("No rules in the catalog.");
            } else {
                for rule in knowledge.rules() {
                    let conditions: Vec<&str> =
                        rule.conditions.iter().map(|c| c.as_str()).collect();
                    println!(
                        "{}: IF {} THEN {}",
                        rule.code,
                        conditions.join(" AND "),
                        rule.diagnosis
                    );
                    if !rule.solution.is_empty() {
                        println!("    solution: {}", rule.solution);
                    }
                }
            }
        }
        Some(Commands::Lint { kb }) => {
            let knowledge = load_knowledge(kb)?;
            let dangling = knowledge.dangling_conditions();
            if dangling.is_empty() {
                println!("No dangling conditions found.");
            } else {
                for item in &dangling {
                    println!(
                        "rule {} references unknown symptom code {}",
                        item.rule, item.condition
                    );
                }
            }
        }
        Some(Commands::Convert {
            kerusakan,
            gejala,
            output,
        }) => {
            let summary = convert::convert(&kerusakan, &gejala, &output)?;
            println!("Knowledge base saved to: {}", output.display());
            println!("Total symptoms: {}", summary.symptoms);
            println!("Total rules: {}", summary.rules);
        }
        None => {
            println!("Use 'pakar --help' for commands");
        }
    }

    Ok(())
}
