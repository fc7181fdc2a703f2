//! Call data encoding for the 0x v2 exchange.

use {
    crate::simulator::ExchangeEncoding,
    alloy::{
        primitives::{Address, Bytes, U256},
        sol,
        sol_types::SolCall,
    },
    anyhow::{Result, ensure},
    model::order::SignedOrder,
};

sol! {
    #[allow(missing_docs)]
    interface IExchange {
        struct Order {
            address makerAddress;
            address takerAddress;
            address feeRecipientAddress;
            address senderAddress;
            uint256 makerAssetAmount;
            uint256 takerAssetAmount;
            uint256 makerFee;
            uint256 takerFee;
            uint256 expirationTimeSeconds;
            uint256 salt;
            bytes makerAssetData;
            bytes takerAssetData;
        }

        struct FillResults {
            uint256 makerAssetFilledAmount;
            uint256 takerAssetFilledAmount;
            uint256 makerFeePaid;
            uint256 takerFeePaid;
        }

        function marketBuyOrders(
            Order[] memory orders,
            uint256 makerAssetFillAmount,
            bytes[] memory signatures
        ) public returns (FillResults memory fillResults);

        function marketSellOrders(
            Order[] memory orders,
            uint256 takerAssetFillAmount,
            bytes[] memory signatures
        ) public returns (FillResults memory fillResults);
    }
}

/// The deployed 0x v2 exchange contract.
#[derive(Clone, Copy, Debug)]
pub struct Exchange {
    address: Address,
}

impl Exchange {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    /// Splits orders into the exchange's order tuples and the matching
    /// signatures. Orders signed for another exchange can never fill here.
    fn encode_orders(&self, orders: &[SignedOrder]) -> Result<(Vec<IExchange::Order>, Vec<Bytes>)> {
        orders
            .iter()
            .map(|order| {
                ensure!(
                    order.exchange_address == self.address,
                    "order signed for exchange {} instead of {}",
                    order.exchange_address,
                    self.address
                );
                Ok((
                    IExchange::Order {
                        makerAddress: order.maker_address,
                        takerAddress: order.taker_address,
                        feeRecipientAddress: order.fee_recipient_address,
                        senderAddress: order.sender_address,
                        makerAssetAmount: order.maker_asset_amount,
                        takerAssetAmount: order.taker_asset_amount,
                        makerFee: order.maker_fee,
                        takerFee: order.taker_fee,
                        expirationTimeSeconds: order.expiration_time_seconds,
                        salt: order.salt,
                        makerAssetData: order.maker_asset_data.clone(),
                        takerAssetData: order.taker_asset_data.clone(),
                    },
                    order.signature.clone(),
                ))
            })
            .collect::<Result<Vec<_>>>()
            .map(|encoded| encoded.into_iter().unzip())
    }
}

impl ExchangeEncoding for Exchange {
    fn market_buy_orders(&self, orders: &[SignedOrder], amount: U256) -> Result<Bytes> {
        let (orders, signatures) = self.encode_orders(orders)?;
        Ok(IExchange::marketBuyOrdersCall {
            orders,
            makerAssetFillAmount: amount,
            signatures,
        }
        .abi_encode()
        .into())
    }

    fn market_sell_orders(&self, orders: &[SignedOrder], amount: U256) -> Result<Bytes> {
        let (orders, signatures) = self.encode_orders(orders)?;
        Ok(IExchange::marketSellOrdersCall {
            orders,
            takerAssetFillAmount: amount,
            signatures,
        }
        .abi_encode()
        .into())
    }

    fn address(&self) -> Address {
        self.address
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::fill_results::FillResults,
        alloy::sol_types::SolValue,
        model::asset_data,
        testlib::{
            protocol::EXCHANGE,
            tokens::{WETH, ZRX},
        },
    };

    fn order(salt: u64) -> SignedOrder {
        SignedOrder {
            maker_asset_amount: U256::from(1_000),
            taker_asset_amount: U256::from(2_000),
            taker_fee: U256::from(10),
            salt: U256::from(salt),
            maker_asset_data: asset_data::erc20(ZRX),
            taker_asset_data: asset_data::erc20(WETH),
            exchange_address: EXCHANGE,
            signature: Bytes::from(vec![0x1b, salt as u8, 0x02]),
            ..Default::default()
        }
    }

    #[test]
    fn encodes_market_buy_orders() {
        let exchange = Exchange::new(EXCHANGE);
        let data = exchange
            .market_buy_orders(&[order(1), order(2)], U256::from(500))
            .unwrap();
        assert_eq!(data[..4], IExchange::marketBuyOrdersCall::SELECTOR);

        let call = IExchange::marketBuyOrdersCall::abi_decode(&data).unwrap();
        assert_eq!(call.makerAssetFillAmount, U256::from(500));
        assert_eq!(call.orders.len(), 2);
        assert_eq!(call.orders[1].salt, U256::from(2));
        assert_eq!(call.orders[0].takerAssetData, asset_data::erc20(WETH));
        assert_eq!(call.signatures, vec![order(1).signature, order(2).signature]);
    }

    #[test]
    fn encodes_market_sell_orders() {
        let exchange = Exchange::new(EXCHANGE);
        let data = exchange
            .market_sell_orders(&[order(3)], U256::from(42))
            .unwrap();
        assert_eq!(data[..4], IExchange::marketSellOrdersCall::SELECTOR);

        let call = IExchange::marketSellOrdersCall::abi_decode(&data).unwrap();
        assert_eq!(call.takerAssetFillAmount, U256::from(42));
        assert_eq!(call.orders[0].takerFee, U256::from(10));
    }

    #[test]
    fn rejects_orders_for_other_exchanges() {
        let exchange = Exchange::new(EXCHANGE);
        let foreign = SignedOrder {
            exchange_address: Address::repeat_byte(0x42),
            ..order(1)
        };
        assert!(
            exchange
                .market_buy_orders(&[order(1), foreign], U256::from(1))
                .is_err()
        );
    }

    #[test]
    fn fill_results_decode_exchange_return_data() {
        let returned = IExchange::FillResults {
            makerAssetFilledAmount: U256::from(1),
            takerAssetFilledAmount: U256::from(2),
            makerFeePaid: U256::from(3),
            takerFeePaid: U256::MAX,
        }
        .abi_encode();

        assert_eq!(
            FillResults::decode(&returned),
            Some(FillResults {
                maker_asset_filled_amount: U256::from(1),
                taker_asset_filled_amount: U256::from(2),
                maker_fee_paid: U256::from(3),
                taker_fee_paid: U256::MAX,
            })
        );
    }
}
