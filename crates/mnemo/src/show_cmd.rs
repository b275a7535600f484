use anyhow::Result;

use mnemo_config::Config;
use mnemo_memory::MemoryStore;

/// Print the document, raw or wrapped for prompt injection.
pub fn handle_show(config: &Config, context: bool) -> Result<()> {
    let store = MemoryStore::new(config.storage.memory_file.clone());

    if context {
        println!("{}", store.context_for_prompt());
    } else {
        print!("{}", store.load()?);
    }

    Ok(())
}
