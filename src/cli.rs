// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print JSON instead of a table"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    ]
}

fn id_arg() -> Arg {
    Arg::new("id").required(true).help("Transaction or user id")
}

fn yes_arg() -> Arg {
    Arg::new("yes")
        .long("yes")
        .short('y')
        .action(ArgAction::SetTrue)
        .help("Skip the confirmation prompt")
}

fn tx_field_args(required: bool) -> [Arg; 5] {
    [
        Arg::new("date")
            .long("date")
            .help("YYYY-MM-DD (defaults to today when adding)"),
        Arg::new("amount").long("amount").required(required),
        Arg::new("currency")
            .long("currency")
            .required(required)
            .help("USD ($) or FC"),
        Arg::new("channel")
            .long("channel")
            .required(required)
            .help("Entrées or Sorties"),
        Arg::new("motif").long("motif").required(required),
    ]
}

pub fn build_cli() -> Command {
    Command::new("finsys")
        .version(clap::crate_version!())
        .about("FinSys: track entrées and sorties, approvals and balances")
        .subcommand_required(false)
        .subcommand(
            Command::new("config")
                .about("Local settings")
                .subcommand(Command::new("show").about("Show the effective API URL and session"))
                .subcommand(
                    Command::new("set-api")
                        .about("Store the backend base URL")
                        .arg(Arg::new("url").required(true)),
                ),
        )
        .subcommand(
            Command::new("auth")
                .about("Log in, register, log out")
                .subcommand(
                    Command::new("login")
                        .arg(Arg::new("email").long("email").required(true))
                        .arg(Arg::new("password").long("password").required(true)),
                )
                .subcommand(
                    Command::new("register")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("surname").long("surname").required(true))
                        .arg(Arg::new("email").long("email").required(true))
                        .arg(Arg::new("password").long("password").required(true))
                        .arg(Arg::new("dob").long("dob").help("Date of birth, YYYY-MM-DD"))
                        .arg(Arg::new("address").long("address"))
                        .arg(Arg::new("photo").long("photo").help("Path to a profile photo")),
                )
                .subcommand(Command::new("logout"))
                .subcommand(Command::new("whoami")),
        )
        .subcommand(
            Command::new("dashboard")
                .about("Balance cards and recent activity")
                .args(json_args()),
        )
        .subcommand(
            Command::new("tx")
                .about("Your transactions")
                .subcommand(
                    Command::new("list")
                        .arg(Arg::new("channel").long("channel"))
                        .arg(Arg::new("status").long("status"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("add")
                        .args(tx_field_args(true))
                        .arg(Arg::new("file").long("file").help("Receipt to attach"))
                        .arg(yes_arg()),
                ),
        )
        .subcommand(
            Command::new("financier")
                .about("All transactions with approved balances and top contributors")
                .arg(
                    Arg::new("top")
                        .long("top")
                        .value_parser(value_parser!(usize))
                        .default_value("3"),
                )
                .args(json_args()),
        )
        .subcommand(
            Command::new("admin")
                .about("Administration")
                .subcommand(
                    Command::new("tx")
                        .subcommand(Command::new("list").args(json_args()))
                        .subcommand(Command::new("pending").args(json_args()))
                        .subcommand(Command::new("show").arg(id_arg()).args(json_args()))
                        .subcommand(Command::new("approve").arg(id_arg()))
                        .subcommand(Command::new("decline").arg(id_arg()))
                        .subcommand(
                            Command::new("update")
                                .arg(id_arg())
                                .args(tx_field_args(false)),
                        )
                        .subcommand(Command::new("delete").arg(id_arg()).arg(yes_arg())),
                )
                .subcommand(
                    Command::new("users")
                        .subcommand(Command::new("list").args(json_args()))
                        .subcommand(
                            Command::new("update")
                                .arg(id_arg())
                                .arg(Arg::new("name").long("name"))
                                .arg(Arg::new("surname").long("surname"))
                                .arg(Arg::new("email").long("email"))
                                .arg(Arg::new("address").long("address"))
                                .arg(Arg::new("role").long("role").help(
                                    "user, admin, financier, pasteur or vice-president",
                                )),
                        )
                        .subcommand(Command::new("delete").arg(id_arg()).arg(yes_arg())),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write transactions to a file")
                .subcommand(
                    Command::new("transactions")
                        .arg(Arg::new("format").long("format").required(true).help("csv|json"))
                        .arg(Arg::new("out").long("out").required(true))
                        .arg(
                            Arg::new("scope")
                                .long("scope")
                                .value_parser(["mine", "all"])
                                .default_value("mine"),
                        )
                        .arg(Arg::new("channel").long("channel")),
                ),
        )
}
