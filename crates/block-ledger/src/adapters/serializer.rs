use crate::domain::block::Block;
use crate::domain::errors::SerializationError;
use crate::ports::outbound::BlockSerializer;

/// Default block serializer using bincode.
#[derive(Debug, Default)]
pub struct BincodeBlockSerializer;

impl BlockSerializer for BincodeBlockSerializer {
    fn serialize(&self, block: &Block) -> Result<Vec<u8>, SerializationError> {
        bincode::serialize(block).map_err(|e| SerializationError {
            message: e.to_string(),
        })
    }

    fn deserialize(&self, data: &[u8]) -> Result<Block, SerializationError> {
        bincode::deserialize(data).map_err(|e| SerializationError {
            message: e.to_string(),
        })
    }
}
