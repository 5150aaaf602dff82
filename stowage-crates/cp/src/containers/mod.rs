mod id_vec;

pub(crate) use id_vec::DenseId;
pub(crate) use id_vec::IdVec;
