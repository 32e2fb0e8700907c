use anyhow::Context;
use dotenv::dotenv;
use multichain_wallet_core::{AggregatorConfig, ChainRegistry, NAME, VERSION};

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let registry = ChainRegistry::from_env().context("Invalid chain registry")?;
    let config = AggregatorConfig::from_env().context("Invalid aggregator configuration")?;

    println!("{} v{} Network Configuration:\n", NAME, VERSION);
    println!("  Switch timeout: {}ms", config.switch_timeout.as_millis());
    println!("  Inter-network delay: {}ms\n", config.inter_network_delay.as_millis());

    for network in &registry {
        println!("  {} ({})", network.display_name, network.id);
        println!("    Native: {} ({} decimals)", network.native_symbol, network.native_decimals);
        println!("    RPC URL: {}", network.rpc_endpoint);
        let tokens: Vec<&str> = network.known_tokens.iter().map(|t| t.symbol.as_str()).collect();
        println!("    Tokens: {}", if tokens.is_empty() { "(none)".to_string() } else { tokens.join(", ") });
    }
    Ok(())
}
