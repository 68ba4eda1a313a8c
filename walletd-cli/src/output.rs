//! Terminal output

use walletd_core::{InitReport, InitStatus, WalletConfig, WalletHandle};

pub fn print_report(report: &InitReport) {
    println!();
    println!("== {} ({}) ==", report.chain, report.mode);
    println!("  Public key: {}", report.public_key);
    println!("  Address:    {}", report.address);

    match &report.account {
        Some(account) => println!("  Account:    {}", account),
        None => println!("  Account:    none"),
    }
    if let Some(balance) = &report.balance {
        println!("  Balance:    {}", balance);
    }

    let marker = match report.status {
        InitStatus::Provisioned => "ok",
        InitStatus::Simulated(_) => "simulated",
        InitStatus::ManualProvisioningRequired | InitStatus::LocalOnly(_) => "keys only",
    };
    println!("  Status:     {} [{}]", report.status, marker);

    for line in report.guidance() {
        println!("  {}", line);
    }
}

pub fn print_private_key(wallet: &WalletHandle) -> anyhow::Result<()> {
    let exported = wallet.export_private_key()?;
    println!("  Private key: {}", exported.as_str());
    println!("  Keep this key secret. Anyone holding it controls the wallet.");
    Ok(())
}

/// Print the configuration as JSON with the operator key masked
pub fn print_config(config: &WalletConfig) -> anyhow::Result<()> {
    let mut shown = config.clone();
    if shown.hedera.operator_key.is_some() {
        shown.hedera.operator_key = Some("<redacted>".to_string());
    }
    println!("{}", serde_json::to_string_pretty(&shown)?);
    Ok(())
}
