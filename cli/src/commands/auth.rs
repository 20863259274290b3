use anyhow::Result;
use serde_json::json;

use tally_core::store::DataStore;

pub(crate) async fn cmd_register(
    store: &mut DataStore,
    email: &str,
    password: &str,
    name: &str,
    json: bool,
) -> Result<()> {
    let user = store.register(email, password, name).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
    } else {
        println!("Welcome, {}! Signed in as {}", user.name, user.email);
        if user.id.starts_with("local-") {
            eprintln!("Note: no remote configured, this account lives on this device only");
        }
        println!("Next: set up your profile with `tally profile set`");
    }
    Ok(())
}

pub(crate) async fn cmd_login(
    store: &mut DataStore,
    email: &str,
    password: &str,
    json: bool,
) -> Result<()> {
    let user = store.login(email, password).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
    } else {
        println!("Signed in as {}", user.email);
    }
    Ok(())
}

pub(crate) async fn cmd_logout(store: &mut DataStore, json: bool) -> Result<()> {
    store.logout().await?;
    if json {
        println!("{}", json!({ "logged_out": true }));
    } else {
        println!("Signed out. Local data cleared.");
    }
    Ok(())
}

pub(crate) fn cmd_whoami(store: &DataStore, json: bool) -> Result<()> {
    match store.current_user() {
        Some(user) => {
            if json {
                println!("{}", serde_json::to_string_pretty(user)?);
            } else {
                println!("{} <{}>", user.name, user.email);
            }
        }
        None => {
            if json {
                println!("{}", json!({ "user": null }));
            } else {
                eprintln!("Not signed in. Use `tally login` or `tally register`.");
                std::process::exit(2);
            }
        }
    }
    Ok(())
}
