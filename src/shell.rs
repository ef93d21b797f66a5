//! Line-oriented driver for the workflows.
//!
//! Owns the current route, constructs one workflow per navigation and drops
//! it on navigation away, and delivers one-second ticks to views that carry
//! a countdown. Rendering is plain prompts; all behavior lives in the
//! workflow types.

use crate::routing::{guard, Route};
use crate::services::session::SessionStore;
use crate::workflows::home::HomeWorkflow;
use crate::workflows::login::LoginWorkflow;
use crate::workflows::reset::{ResetStage, ResetWorkflow};
use crate::workflows::signup::SignupWorkflow;
use crate::workflows::verify::VerifyWorkflow;
use crate::App;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::time::MissedTickBehavior;

type Input = Lines<BufReader<Stdin>>;

pub async fn run(app: &mut App) -> anyhow::Result<()> {
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut route = Route::Login;

    loop {
        route = guard(route, app.sessions.as_ref());
        let next = match route {
            Route::Login => login_view(app, &mut input).await?,
            Route::Signup => signup_view(app, &mut input).await?,
            Route::Home => home_view(app, &mut input).await?,
            Route::VerifyAccount => verify_view(app, &mut input).await?,
            Route::ForgotPassword => reset_view(app, &mut input).await?,
        };
        match next {
            Some(r) => route = r,
            None => return Ok(()),
        }
    }
}

async fn prompt(input: &mut Input, label: &str) -> anyhow::Result<Option<String>> {
    print!("{label}");
    std::io::stdout().flush()?;
    Ok(input.next_line().await?.map(|l| l.trim().to_string()))
}

fn show_feedback(message: Option<&str>) {
    if let Some(message) = message {
        println!("{message}");
    }
}

async fn login_view(app: &mut App, input: &mut Input) -> anyhow::Result<Option<Route>> {
    let mut workflow = LoginWorkflow::new();
    if let Some(route) = workflow.on_mount(app.sessions.as_ref()) {
        return Ok(Some(route));
    }

    println!("\n== Login ==  ('signup' | 'forgot' | 'quit')");
    loop {
        let Some(email) = prompt(input, "email: ").await? else {
            return Ok(None);
        };
        match email.as_str() {
            "signup" => return Ok(Some(Route::Signup)),
            "forgot" => return Ok(Some(Route::ForgotPassword)),
            "quit" => return Ok(None),
            _ => {}
        }
        let Some(password) = prompt(input, "password: ").await? else {
            return Ok(None);
        };
        let Some(remember) = prompt(input, "remember me? [y/N]: ").await? else {
            return Ok(None);
        };

        workflow.set_email(email);
        workflow.set_password(password);
        workflow.set_remember_me(remember.eq_ignore_ascii_case("y"));

        if let Some(route) = workflow
            .submit(app.gateway.as_ref(), app.sessions.as_mut())
            .await
        {
            return Ok(Some(route));
        }
        show_feedback(workflow.feedback().message());
    }
}

async fn signup_view(app: &mut App, input: &mut Input) -> anyhow::Result<Option<Route>> {
    let mut workflow = SignupWorkflow::new();

    println!("\n== Sign Up ==  ('login' | 'quit')");
    loop {
        let Some(email) = prompt(input, "email: ").await? else {
            return Ok(None);
        };
        match email.as_str() {
            "login" => return Ok(Some(Route::Login)),
            "quit" => return Ok(None),
            _ => {}
        }
        let Some(password) = prompt(input, "password: ").await? else {
            return Ok(None);
        };
        let Some(confirm) = prompt(input, "re-enter password: ").await? else {
            return Ok(None);
        };

        workflow.set_email(email);
        workflow.set_password(password);
        workflow.set_confirm_password(confirm);

        workflow.submit(app.gateway.as_ref()).await;
        show_feedback(workflow.feedback().message());
    }
}

async fn home_view(app: &mut App, input: &mut Input) -> anyhow::Result<Option<Route>> {
    let mut workflow = HomeWorkflow::new();
    if let Some(route) = workflow
        .on_mount(app.gateway.as_ref(), app.sessions.as_mut())
        .await
    {
        return Ok(Some(route));
    }

    // The guard already ran; the identity is present.
    if let Some(identity) = app.sessions.current() {
        println!("\n== Home ==  signed in as {}  ('logout' | 'quit')", identity.email);
    }
    if workflow.needs_verification() {
        println!("Your account is not verified yet. Type 'verify' to verify now.");
    }

    loop {
        let Some(line) = prompt(input, "> ").await? else {
            return Ok(None);
        };
        match line.as_str() {
            "quit" => return Ok(None),
            "logout" => {
                if let Some(route) = logout(app).await {
                    return Ok(Some(route));
                }
            }
            "verify" if workflow.needs_verification() => {
                if let Some(route) = workflow.verify_now() {
                    return Ok(Some(route));
                }
            }
            _ => println!("unknown command"),
        }
    }
}

/// Logout never silently fails: on a gateway error the local session is kept
/// and the user stays put, mirroring the rest of the error handling.
async fn logout(app: &mut App) -> Option<Route> {
    match app.gateway.logout().await {
        Ok(()) | Err(crate::services::error::GatewayError::SessionExpired) => {
            if let Err(e) = app.sessions.clear() {
                tracing::error!("Failed to clear session on logout: {}", e);
            }
            tracing::info!("User logged out");
            Some(Route::Login)
        }
        Err(e) => {
            tracing::warn!("Logout failed: {}", e);
            println!("Logout failed. Please try again.");
            None
        }
    }
}

async fn verify_view(app: &mut App, input: &mut Input) -> anyhow::Result<Option<Route>> {
    let mut workflow = VerifyWorkflow::new();
    if let Some(route) = workflow
        .on_mount(app.gateway.as_ref(), app.sessions.as_mut())
        .await
    {
        return Ok(Some(route));
    }

    println!("\n== Verify Your Account ==  ('send' | 6-digit code | 'skip' | 'logout' | 'quit')");
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            line = input.next_line() => {
                let Some(line) = line? else { return Ok(None) };
                match line.trim() {
                    "quit" => return Ok(None),
                    "logout" => {
                        if let Some(route) = logout(app).await {
                            return Ok(Some(route));
                        }
                    }
                    "send" => {
                        if !workflow.can_send() {
                            println!(
                                "Wait {} seconds before sending again.",
                                workflow.cooldown_remaining()
                            );
                        } else if let Some(route) = workflow
                            .send_code(app.gateway.as_ref(), app.sessions.as_mut())
                            .await
                        {
                            return Ok(Some(route));
                        }
                        show_feedback(workflow.feedback().message());
                    }
                    "skip" => {
                        if let Some(route) = workflow.skip_wait() {
                            return Ok(Some(route));
                        }
                    }
                    code => {
                        workflow.set_code(code);
                        if let Some(route) = workflow
                            .submit_code(app.gateway.as_ref(), app.sessions.as_mut())
                            .await
                        {
                            return Ok(Some(route));
                        }
                        if let Some(error) = workflow.code_error() {
                            println!("{error}");
                        } else {
                            show_feedback(workflow.feedback().message());
                        }
                    }
                }
            }
            _ = ticker.tick() => {
                if let Some(route) = workflow.tick() {
                    return Ok(Some(route));
                }
            }
        }
    }
}

async fn reset_view(app: &mut App, input: &mut Input) -> anyhow::Result<Option<Route>> {
    let mut workflow = ResetWorkflow::new();

    println!("\n== Forgot Password ==  ('login' | 'quit')");
    println!("Enter your email address to check if it exists in our system.");
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            line = input.next_line() => {
                let Some(line) = line? else { return Ok(None) };
                let line = line.trim().to_string();
                match line.as_str() {
                    "quit" => return Ok(None),
                    "login" => return Ok(Some(Route::Login)),
                    _ => {}
                }

                let route = match workflow.stage() {
                    ResetStage::EmailEntry => {
                        workflow.set_email(line);
                        workflow
                            .submit_email(app.gateway.as_ref(), app.sessions.as_mut())
                            .await
                    }
                    ResetStage::CodeEntry => {
                        workflow.set_code(line);
                        workflow
                            .submit_code(app.gateway.as_ref(), app.sessions.as_mut())
                            .await
                    }
                    ResetStage::PasswordEntry => {
                        let Some(confirm) = prompt(input, "re-enter new password: ").await? else {
                            return Ok(None);
                        };
                        workflow.set_new_password(line);
                        workflow.set_confirm_password(confirm);
                        workflow
                            .submit_password(app.gateway.as_ref(), app.sessions.as_mut())
                            .await
                    }
                    ResetStage::Done => {
                        if line == "skip" { workflow.skip_wait() } else { None }
                    }
                };
                if let Some(route) = route {
                    return Ok(Some(route));
                }
                show_feedback(workflow.feedback().message());
            }
            _ = ticker.tick() => {
                if let Some(route) = workflow.tick() {
                    return Ok(Some(route));
                }
            }
        }
    }
}
