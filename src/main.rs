// This is my main entry point for the ledger node CLI
// I'm importing the components I need to wire wallets, nodes, and the
// in-process transport together
use clap::Parser;
use data_encoding::HEXLOWER;
use log::{error, LevelFilter};
use orechain::{Command, InProcessGateway, Node, NullGateway, Opt, PeerGateway, Settings, Wallet};
use std::process;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() {
    // I initialize logging so I can see what the node is doing
    // Info level gives me enough detail without being too verbose
    env_logger::builder().filter_level(LevelFilter::Info).init();

    // I parse the command line arguments using clap - this gives me a nice CLI interface
    let opt = Opt::parse();

    // I run the actual command and handle any errors that might occur
    // If something goes wrong, I log the error and exit with code 1
    if let Err(e) = run_command(opt.command) {
        error!("Error: {e}");
        process::exit(1);
    }
}

// This is where I handle all the different CLI commands
fn run_command(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        // When I want a fresh keypair and its address
        Command::Createwallet => {
            let wallet = Wallet::new()?;
            println!("Your new address: {}", wallet.get_address());
            println!(
                "Public key (hex): {}",
                HEXLOWER.encode(wallet.get_public_key())
            );
        }
        // When I want to watch the whole transfer-sign-mine cycle on one node
        Command::Demo => run_demo()?,
        // When I want to see two nodes converge on the same chain
        Command::Simulate => run_simulation()?,
        // When I want the periodic miner to run for a while
        Command::Mine { seconds } => run_mining(seconds)?,
    }
    Ok(())
}

fn run_demo() -> Result<(), Box<dyn std::error::Error>> {
    // One wallet mines, two wallets trade
    let miner_wallet = Wallet::new()?;
    let wallet_a = Wallet::new()?;
    let wallet_b = Wallet::new()?;

    let node = Node::with_settings(
        miner_wallet.get_address(),
        Settings::from_env(),
        Arc::new(NullGateway),
    )?;

    // A pays B with a signed transfer. A has no funds yet; the default
    // policy allows the overdraft.
    let request = wallet_a.signed_transfer(wallet_b.get_address(), 1.0)?;
    println!("Transfer A -> B accepted: {}", node.submit_transaction(&request));
    node.mine_once();

    // B sends half of it back
    let request = wallet_b.signed_transfer(wallet_a.get_address(), 0.5)?;
    println!("Transfer B -> A accepted: {}", node.submit_transaction(&request));
    node.mine_once();

    println!("{}", serde_json::to_string_pretty(&node.chain())?);
    println!("Balance of A: {}", node.balance(wallet_a.get_address()));
    println!("Balance of B: {}", node.balance(wallet_b.get_address()));
    println!(
        "Balance of miner: {}",
        node.balance(miner_wallet.get_address())
    );
    Ok(())
}

fn run_simulation() -> Result<(), Box<dyn std::error::Error>> {
    let gateway = Arc::new(InProcessGateway::new());
    let miner_a = Wallet::new()?;
    let miner_b = Wallet::new()?;

    let node_a = Node::with_settings(
        miner_a.get_address(),
        Settings::from_env(),
        Arc::clone(&gateway) as Arc<dyn PeerGateway>,
    )?;
    let node_b = Node::with_settings(
        miner_b.get_address(),
        Settings::from_env(),
        Arc::clone(&gateway) as Arc<dyn PeerGateway>,
    )?;

    // Each node can see the other through the in-process transport
    gateway.register("alpha", node_a.ledger());
    gateway.register("beta", node_b.ledger());
    node_a.register_neighbor("beta");
    node_b.register_neighbor("alpha");

    // alpha mines two blocks; each one is announced to beta as it lands
    node_a.mine_once();
    node_a.mine_once();
    println!("alpha chain: {} blocks", node_a.chain().len());
    println!("beta chain after announcements: {} blocks", node_b.chain().len());

    // beta runs an explicit consensus round as well
    let replaced = node_b.run_consensus();
    println!("beta consensus round replaced chain: {replaced}");

    let tip_a = node_a.chain().last().and_then(|block| block.hash().ok());
    let tip_b = node_b.chain().last().and_then(|block| block.hash().ok());
    println!("nodes agree: {}", tip_a.is_some() && tip_a == tip_b);
    Ok(())
}

fn run_mining(seconds: u64) -> Result<(), Box<dyn std::error::Error>> {
    let wallet = Wallet::new()?;
    let node = Node::with_settings(
        wallet.get_address(),
        Settings::from_env(),
        Arc::new(NullGateway),
    )?;

    println!("Mining to {} for {seconds} seconds", wallet.get_address());
    node.start_mining();
    thread::sleep(Duration::from_secs(seconds));
    node.stop_mining();

    let chain = node.chain();
    println!("Mined {} blocks", chain.len() - 1);
    println!("Miner balance: {}", node.balance(wallet.get_address()));
    Ok(())
}
