use solana_client::client_error::ClientError;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_message::Hash;

/// Ledger RPC calls the prover depends on.
///
/// Only one call is needed: the latest blockhash, which every transaction must carry
/// and which expires after roughly a minute and a half. A signed transfer can therefore
/// not be replayed indefinitely.
///
/// Implemented for anything that dereferences to a nonblocking [`RpcClient`]
/// (e.g. `Arc<RpcClient>`).
pub trait RpcClientLike {
    fn get_latest_blockhash(&self) -> impl Future<Output = Result<Hash, ClientError>> + Send;
}

impl<Container: AsRef<RpcClient>> RpcClientLike for Container {
    fn get_latest_blockhash(&self) -> impl Future<Output = Result<Hash, ClientError>> + Send {
        RpcClient::get_latest_blockhash(self.as_ref())
    }
}
