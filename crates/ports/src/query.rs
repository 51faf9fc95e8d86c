//! 记录查询的封闭变体
//!
//! 列表端点不再按调用点即兴拼接过滤条件，而是统一走这三种形态，
//! 由各仓储的单一取数路径翻译为存储层 Filter

use mesa_common::OwnerId;

/// 列表查询
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordFilter<F> {
    /// 全量（仅管理端）
    All,
    /// 按归属
    ByOwner(OwnerId),
    /// 按归属加一个领域标志（如审批状态）
    ByOwnerAndFlag(OwnerId, F),
}

impl<F> RecordFilter<F> {
    pub fn owner(&self) -> Option<&OwnerId> {
        match self {
            Self::All => None,
            Self::ByOwner(owner) | Self::ByOwnerAndFlag(owner, _) => Some(owner),
        }
    }

    pub fn flag(&self) -> Option<&F> {
        match self {
            Self::ByOwnerAndFlag(_, flag) => Some(flag),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesa_common::VendorId;

    #[test]
    fn test_owner_accessor() {
        let owner = OwnerId::Vendor(VendorId::new());

        let all: RecordFilter<bool> = RecordFilter::All;
        assert!(all.owner().is_none());

        let by_owner: RecordFilter<bool> = RecordFilter::ByOwner(owner.clone());
        assert_eq!(by_owner.owner(), Some(&owner));

        let flagged = RecordFilter::ByOwnerAndFlag(owner.clone(), true);
        assert_eq!(flagged.owner(), Some(&owner));
        assert_eq!(flagged.flag(), Some(&true));
    }
}
