mod args;
mod presenter;

use std::sync::Arc;

use services::{Clock, QuizEngine, SessionPhase};
use storage::JsonFileSource;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

use args::{Args, print_usage};
use presenter::{parse_choice, render_question, render_start};

type Input = Lines<BufReader<Stdin>>;

async fn prompt(text: &str) -> std::io::Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await
}

/// Play one session until the engine returns to idle.
async fn play(engine: &QuizEngine, input: &mut Input) -> Result<(), Box<dyn std::error::Error>> {
    engine.start().await?;
    let mut snapshot = engine
        .wait_for(|s| s.phase != SessionPhase::Loading)
        .await?;

    while snapshot.phase == SessionPhase::AwaitingAnswer {
        prompt(&render_question(&snapshot)).await?;
        prompt("Your answer > ").await?;
        let Some(line) = input.next_line().await? else {
            return Ok(());
        };

        let Some(choice) = parse_choice(&line) else {
            prompt("Please enter an option number.\n").await?;
            continue;
        };
        if let Err(err) = engine.submit_answer(choice).await {
            prompt(&format!("{err}\n")).await?;
            continue;
        }

        prompt(&render_question(&engine.snapshot())).await?;
        snapshot = engine
            .wait_for(|s| s.phase != SessionPhase::Grading)
            .await?;
    }

    if snapshot.phase == SessionPhase::Exhausted {
        prompt(&render_question(&snapshot)).await?;
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_env().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    if args.show_help {
        print_usage();
        return Ok(());
    }

    let mut source = JsonFileSource::new(args.questions.clone());
    if let Some(collection) = &args.collection {
        source = source.with_collection(collection.clone());
    }
    tracing::info!(path = %args.questions.display(), "using question file");

    let engine = QuizEngine::spawn(Arc::new(source), args.quiz_config(), Clock::system());
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt(&render_start(&engine.snapshot())).await?;
        let Some(line) = input.next_line().await? else {
            break;
        };
        match line.trim() {
            "s" | "start" => play(&engine, &mut input).await?,
            "q" | "quit" => break,
            _ => {}
        }
    }

    engine.shutdown().await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("quiz=info,services=info")),
        )
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
