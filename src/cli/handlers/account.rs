//! Account command handlers.

use anyhow::{Context, Result};

use crate::cache::LocalCache;
use crate::cli::{CheckAuthArgs, ForgotPasswordArgs, LoginArgs, RegisterArgs};
use crate::remote::{AuthSession, Credentials, Registration, User, UserService};
use crate::sync::SyncError;

fn describe(user: &User) -> String {
    let name = user
        .username
        .as_deref()
        .or(user.email.as_deref())
        .unwrap_or("unknown user");
    match &user.id {
        Some(id) => format!("{} [{}]", name, id),
        None => name.to_string(),
    }
}

/// Signs in and stores the token and user id in the cache.
pub fn handle_login<U: UserService, C: LocalCache>(
    args: &LoginArgs,
    password: String,
    users: &U,
    cache: &mut C,
) -> Result<()> {
    let credentials = Credentials {
        email: args.email.trim().to_string(),
        password,
    };
    let session = users.login(&credentials).context("login failed")?;
    session.store(cache).context("failed to store session")?;
    tracing::info!(user_id = %session.user_id(), "signed in");
    println!("Signed in as {}", credentials.email);
    Ok(())
}

pub fn handle_logout<C: LocalCache>(cache: &mut C) -> Result<()> {
    AuthSession::clear(cache).context("failed to clear session")?;
    println!("Signed out");
    Ok(())
}

pub fn handle_register<U: UserService>(
    args: &RegisterArgs,
    password: String,
    users: &U,
) -> Result<()> {
    let registration = Registration {
        email: args.email.trim().to_string(),
        username: args.username.trim().to_string(),
        phone: args.phone.clone(),
        password,
    };
    let message = users.register(&registration).context("registration failed")?;
    println!("{}", message);
    Ok(())
}

pub fn handle_forgot_password<U: UserService>(args: &ForgotPasswordArgs, users: &U) -> Result<()> {
    let message = users
        .forgot_password(args.email.trim())
        .context("password reset request failed")?;
    println!("{}", message);
    Ok(())
}

pub fn handle_check_auth<U: UserService>(args: &CheckAuthArgs, users: &U) -> Result<()> {
    let user = users
        .check_auth(&args.id_token)
        .context("token verification failed")?;
    println!("Token belongs to {}", describe(&user));
    Ok(())
}

pub fn handle_whoami<U: UserService, C: LocalCache>(users: &U, cache: &C) -> Result<()> {
    if AuthSession::load(cache)
        .context("failed to read stored session")?
        .is_none()
    {
        return Err(SyncError::Unauthorized.into());
    }
    let user = users.current_user().context("failed to fetch user")?;
    println!("{}", describe(&user));
    Ok(())
}
