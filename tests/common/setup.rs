//! Test environment bootstrap, mirroring the teacher's
//! `start_test_environment` shape: one `ProgramTest` registered against
//! this program's entrypoint, producing a `BanksClient` plus a funded
//! payer and a blockhash ready to sign transactions with.

use solana_program_test::{processor, BanksClient, ProgramTest};
use solana_sdk::{hash::Hash, signature::Keypair};

use constant_product_amm::process_instruction;

pub struct TestEnvironment {
    pub banks_client: BanksClient,
    pub payer: Keypair,
    pub recent_blockhash: Hash,
}

fn create_program_test() -> ProgramTest {
    ProgramTest::new(
        "constant_product_amm",
        constant_product_amm::id(),
        processor!(process_instruction),
    )
}

pub async fn start_test_environment() -> TestEnvironment {
    let _ = env_logger::try_init();
    let program_test = create_program_test();
    let (banks_client, payer, recent_blockhash) = program_test.start().await;
    TestEnvironment {
        banks_client,
        payer,
        recent_blockhash,
    }
}
