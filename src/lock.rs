//! 此模块提供用一把全局锁保护整个 `SortedList` 的几种方式。所有实现都应实现
//! `LockedList` trait。

use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

use crate::workload::Operation;
use crate::SortedList;

/// 被一把全局锁保护、可在工作线程间共享的链表。
///
/// 每次调用只在单个链表操作期间持有锁，调用返回前即释放；锁之间不会嵌套。
pub trait LockedList: Send + Sync {
    /// 结果日志和进度信息中使用的名字
    const NAME: &'static str;

    /// 用锁包装一个已经填充好的链表。
    fn new(list: SortedList) -> Self
    where
        Self: Sized;

    /// 成员查询
    fn member(&self, value: i32) -> bool;

    /// 插入
    fn insert(&self, value: i32) -> bool;

    /// 删除
    fn delete(&self, value: i32) -> bool;

    /// 取回内部的链表。
    fn into_inner(self) -> SortedList
    where
        Self: Sized;

    /// 执行一次 `op` 操作。
    fn apply(&self, op: Operation, value: i32) -> bool {
        match op {
            Operation::Member => self.member(value),
            Operation::Insert => self.insert(value),
            Operation::Delete => self.delete(value),
        }
    }
}

/// 读写锁：成员查询可以并发持有读锁，插入与删除需要独占的写锁。
pub struct RwLockList(RwLock<SortedList>);

impl LockedList for RwLockList {
    const NAME: &'static str = "rw_lock";

    fn new(list: SortedList) -> Self {
        RwLockList(RwLock::new(list))
    }

    fn member(&self, value: i32) -> bool {
        // 链表操作中途不会 panic，被毒化的锁里的数据依然有序
        let list = self.0.read().unwrap_or_else(PoisonError::into_inner);
        list.contains(value)
    }

    fn insert(&self, value: i32) -> bool {
        let mut list = self.0.write().unwrap_or_else(PoisonError::into_inner);
        list.insert(value)
    }

    fn delete(&self, value: i32) -> bool {
        let mut list = self.0.write().unwrap_or_else(PoisonError::into_inner);
        list.delete(value)
    }

    fn into_inner(self) -> SortedList {
        self.0.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

/// 互斥锁：所有操作（包括成员查询）都互相排斥。
pub struct MutexList(Mutex<SortedList>);

impl MutexList {
    fn lock(&self) -> MutexGuard<'_, SortedList> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LockedList for MutexList {
    const NAME: &'static str = "mutex";

    fn new(list: SortedList) -> Self {
        MutexList(Mutex::new(list))
    }

    fn member(&self, value: i32) -> bool {
        self.lock().contains(value)
    }

    fn insert(&self, value: i32) -> bool {
        self.lock().insert(value)
    }

    fn delete(&self, value: i32) -> bool {
        self.lock().delete(value)
    }

    fn into_inner(self) -> SortedList {
        self.0.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
