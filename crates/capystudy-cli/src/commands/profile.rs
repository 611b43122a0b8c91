use std::path::PathBuf;

use capystudy_core::profile::{ContactKind, Setting};
use capystudy_core::Account;
use clap::{Args, Subcommand, ValueEnum};

use crate::common::{block_on, open_store, print_json, CliResult};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Print the profile as JSON
    Show,
    /// Change the display name
    Rename { name: String },
    /// Attach an email address or phone number
    Bind {
        #[arg(value_enum)]
        kind: ContactArg,
        value: String,
    },
    /// Remove an email address or phone number
    Unbind {
        #[arg(value_enum)]
        kind: ContactArg,
    },
    /// Flip a setting
    Toggle {
        #[arg(value_enum)]
        setting: SettingArg,
    },
    /// Use an image file as the avatar
    Avatar { path: PathBuf },
    /// Use an image file as the banner
    Banner { path: PathBuf },
}

#[derive(Args)]
pub struct LoginArgs {
    /// Email address, or phone number with --phone
    identifier: String,
    #[arg(long)]
    phone: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ContactArg {
    Email,
    Phone,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SettingArg {
    DarkMode,
    Reminders,
}

impl From<ContactArg> for ContactKind {
    fn from(arg: ContactArg) -> Self {
        match arg {
            ContactArg::Email => ContactKind::Email,
            ContactArg::Phone => ContactKind::Phone,
        }
    }
}

pub fn run(action: ProfileAction) -> CliResult {
    let store = open_store()?;
    let mut account = Account::load(&store);

    match action {
        ProfileAction::Show => print_json(account.profile())?,
        ProfileAction::Rename { name } => {
            account.rename(&name)?;
            println!("Name set to {}", account.profile().name);
        }
        ProfileAction::Bind { kind, value } => {
            account.bind(kind.into(), &value)?;
            println!("ok");
        }
        ProfileAction::Unbind { kind } => {
            account.unbind(kind.into());
            println!("ok");
        }
        ProfileAction::Toggle { setting } => {
            let (setting, label) = match setting {
                SettingArg::DarkMode => (Setting::DarkMode, "dark mode"),
                SettingArg::Reminders => (Setting::Reminders, "reminders"),
            };
            let on = account.toggle(setting);
            println!("{label}: {}", if on { "on" } else { "off" });
        }
        ProfileAction::Avatar { path } => {
            block_on(account.set_avatar_from_file(&path))??;
            println!("Avatar updated");
        }
        ProfileAction::Banner { path } => {
            block_on(account.set_banner_from_file(&path))??;
            println!("Banner updated");
        }
    }
    Ok(())
}

pub fn login(args: LoginArgs) -> CliResult {
    let store = open_store()?;
    let mut account = Account::load(&store);
    let kind = if args.phone { ContactKind::Phone } else { ContactKind::Email };
    account.login(kind, &args.identifier)?;
    println!("Logged in as {}", account.profile().name);
    Ok(())
}

pub fn logout() -> CliResult {
    let store = open_store()?;
    Account::load(&store).logout();
    println!("Logged out");
    Ok(())
}
