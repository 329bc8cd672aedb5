//! Rholang term rendering for balance queries.

use rev_verify_core::{Batch, QueryBuilder, QueryDescriptor};

const ADDRESSES_PLACEHOLDER: &str = "$$addresses$$";

// `return` receives the list of `(address, balance)` tuples built by parMap.
const BALANCES_TEMPLATE: &str = r#"
new
  return,
  rl(`rho:registry:lookup`),
  listOpsCh, RevVaultCh
in {
  rl!(`rho:rchain:revVault`, *RevVaultCh) |
  rl!(`rho:lang:listOps`, *listOpsCh) |
  for (@(_, RevVault) <- RevVaultCh;
       @(_, ListOps) <- listOpsCh) {
    new balanceOf, addressesCh in {
      contract balanceOf(addr, ret) = {
        new vaultCh, balanceCh in {
          @RevVault!("findOrCreate", *addr, *vaultCh) |
          for (@(true, vault) <- vaultCh) {
            @vault!("balance", *balanceCh) |
            for (@balance <- balanceCh) { ret!((*addr, balance)) }
          }
        }
      } |
      addressesCh!($$addresses$$) |
      for (@addresses <- addressesCh) {
        @ListOps!("parMap", addresses, *balanceOf, *return)
      }
    }
  }
}
"#;

/// Render the term returning the balance of every address.
pub fn balances_term(addresses: &[String]) -> String {
    // A JSON array of strings is also a valid Rholang list literal.
    let list = serde_json::Value::from(addresses).to_string();
    BALANCES_TEMPLATE.replace(ADDRESSES_PLACEHOLDER, &list)
}

/// Builds one balance query per batch.
#[derive(Debug, Default, Clone)]
pub struct RholangBalanceQuery;

impl QueryBuilder for RholangBalanceQuery {
    fn build_query(&self, batch: &Batch) -> QueryDescriptor {
        QueryDescriptor {
            batch_id: batch.id,
            payload: balances_term(&batch.keys),
        }
    }
}
